use windows::{
    core::{Error, HSTRING},
    Win32::Foundation::{CloseHandle, GetLastError, ERROR_ALREADY_EXISTS, HANDLE},
    Win32::System::Threading::{CreateMutexW, ReleaseMutex},
};


pub const SINGLE_INSTANCE_MUTEX_NAME : &str = r"Global\vdesk-hotkeys-single-instance";


/// Holds the named mutex marking this process as the running instance, released on drop
pub struct SingleInstance {
    handle : HANDLE,
}

impl SingleInstance {

    /// Ok(None) if another instance already holds the mutex
    pub fn acquire (name:&str) -> Result<Option<SingleInstance>, Error> { unsafe {
        let handle = CreateMutexW (None, true, &HSTRING::from(name))?;
        if GetLastError() == ERROR_ALREADY_EXISTS {
            CloseHandle (handle);
            return Ok(None)
        }
        Ok ( Some ( SingleInstance { handle } ) )
    } }

}

impl Drop for SingleInstance {
    fn drop (&mut self) { unsafe {
        ReleaseMutex (self.handle);
        CloseHandle (self.handle);
    } }
}
