use image::ImageFormat;
use log::{error, info};
use tao::event_loop::{ControlFlow, EventLoopBuilder};
use tray_icon::{Icon, TrayIconBuilder};
use tray_icon::menu::{Menu, MenuEvent, MenuItem};

use crate::app::runner::{AppError, AppShell};


const TRAY_TOOLTIP : &str = "vdesk-hotkeys (Ctrl+Alt+Win+1..9 switch, Shift+Ctrl+Alt+Win+1..9 move)";

fn get_icon () -> Result<Icon, AppError> {
    // 32x32 rgba png .. four desktop tiles, the first one highlighted
    let icon_str = "iVBORw0KGgoAAAANSUhEUgAAACAAAAAgCAYAAABzenr0AAAAUUlEQVR42mNgGAWDCagZWfwnBVOqD6sDbJd+IQqjO+DBs9dE4VEHjDpg1AGjDhj8DhjQongUDIrakJzERNVEOOqAUQeMOmDUAQPugNHacMQBAHOugB/jPUaJAAAAAElFTkSuQmCC";
    use base64::Engine;
    let icon_data = base64::engine::general_purpose::STANDARD.decode (icon_str) .map_err (|e| AppError::Tray (e.to_string()))?;
    let icon = image::io::Reader::with_format (std::io::Cursor::new(icon_data), ImageFormat::Png) .decode()
        .map_err (|e| AppError::Tray (e.to_string()))?
        .to_rgba8();
    let (width, height) = icon.dimensions();
    Icon::from_rgba (icon.into_raw(), width, height) .map_err (|e| AppError::Tray (e.to_string()))
}


/// Runs the tray icon and its menu on this thread until "Exit" is picked (the event loop then ends the process)
pub fn start_system_tray_monitor (mut app:AppShell) -> ! {

    let event_loop = EventLoopBuilder::new().build();

    let tray_menu = Menu::new();
    let open   = MenuItem::new ("Open config",   true, None);
    let reload = MenuItem::new ("Reload config", true, None);
    let exit   = MenuItem::new ("Exit",          true, None);
    if let Err(e) = tray_menu .append_items ( &[ &open, &reload, &exit ] ) {
        error! ("could not build the tray menu: {}", e);
    }

    let mut tray_icon = None;
    let mut icon = get_icon() .map_err (|e| error! ("{} .. running without a tray icon image", e)) .ok();

    let menu_channel = MenuEvent::receiver();

    event_loop .run ( move |event, _, control_flow| {

        *control_flow = ControlFlow::Wait;

        if let tao::event::Event::NewEvents(tao::event::StartCause::Init) = event {
            let mut builder = TrayIconBuilder::new()
                .with_menu (Box::new (tray_menu.clone()))
                .with_tooltip (TRAY_TOOLTIP);
            if let Some(icon) = icon.take() { builder = builder.with_icon (icon) }
            match builder.build() {
                Ok(ti) => tray_icon = Some(ti),
                Err(e) => {
                    error! ("could not create the tray icon: {}", e);
                    app.shutdown();
                    *control_flow = ControlFlow::ExitWithCode(1);
                }
            }
        }

        if let Ok(event) = menu_channel.try_recv() {
            if event.id == exit.id() {
                info! ("exit requested from tray");
                tray_icon.take();
                app.shutdown();
                *control_flow = ControlFlow::Exit;
            }
            else if event.id == reload.id() {
                info! ("reload requested from tray");
                app.reload_config();
            }
            else if event.id == open.id() {
                app.open_config();
            }
        }

    })

}
