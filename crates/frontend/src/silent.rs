use std::cell::Cell;

/// Reentrancy guard raised while the form is being re-rendered from the URL.
///
/// Change notifications fired during that pass must not push the address or fetch.
#[derive(Debug, Default)]
pub struct SilentFlag(Cell<bool>);

impl SilentFlag {
    pub fn is_set(&self) -> bool {
        self.0.get()
    }

    /// Raises the flag until the returned guard is dropped.
    pub fn hold(&self) -> SilentGuard<'_> {
        let previous = self.0.replace(true);
        SilentGuard {
            flag: self,
            previous,
        }
    }
}

pub struct SilentGuard<'a> {
    flag: &'a SilentFlag,
    previous: bool,
}

impl Drop for SilentGuard<'_> {
    fn drop(&mut self) {
        self.flag.0.set(self.previous);
    }
}
