use winvd::Desktop;
use winvd_windows::Win32::Foundation::HWND as VdHwnd;

use crate::*;



/// Virtual-desktop service over the windows shell's virtual desktop manager (via winvd)
# [ derive (Debug, Default, Copy, Clone) ]
pub struct WinVdDesktops;

impl WinVdDesktops {
    fn handle (d:&Desktop) -> Result<DesktopHandle, String> {
        let id       = d.get_id()    .map_err (|e| format! ("{:?}", e))?;
        let position = d.get_index() .map_err (|e| format! ("{:?}", e))?;
        Ok ( DesktopHandle { id: DesktopId (id.to_u128()), position: position as usize } )
    }
}

impl DesktopService for WinVdDesktops {

    fn list_desktops (&self) -> Result<Vec<DesktopHandle>, DesktopError> {
        winvd::get_desktops() .map_err (|e| DesktopError::List (format! ("{:?}", e)))?
            .iter() .map (Self::handle) .collect::<Result<Vec<_>,_>>()
            .map_err (DesktopError::List)
    }

    fn current_desktop (&self) -> Result<DesktopHandle, DesktopError> {
        let d = winvd::get_current_desktop() .map_err (|e| DesktopError::Current (format! ("{:?}", e)))?;
        Self::handle(&d) .map_err (DesktopError::Current)
    }

    fn switch_to (&self, desktop:&DesktopHandle) -> Result<(), DesktopError> {
        winvd::switch_desktop (desktop.position as u32)
            .map_err (|e| DesktopError::Switch { position: desktop.position, reason: format! ("{:?}", e) })
    }

    fn move_window_to (&self, window:WindowHandle, desktop:&DesktopHandle) -> Result<(), MoveError> {
        winvd::move_window_to_desktop (desktop.position as u32, &VdHwnd (window.0 as _))
            .map_err (|e| MoveError { window, position: desktop.position, reason: format! ("{:?}", e) })
    }

    fn is_window_on_desktop (&self, window:WindowHandle, desktop:&DesktopHandle) -> bool {
        winvd::get_desktop_by_window (VdHwnd (window.0 as _)) .ok()
            .and_then (|d| d.get_id().ok())
            .map_or (false, |id| id.to_u128() == desktop.id.0)
    }

}
