use std::path::Path;
use std::process::Command;


static EXPLORER_LOC : &str = r#"C:\Windows\explorer.exe"#;


/// Opens a file with whatever the shell has associated with it (going through explorer, like a double-click would)
pub fn open_with_shell (path:&Path) -> std::io::Result<()> {
    Command::new (EXPLORER_LOC) .arg (path) .spawn() .map (|_| ())
}
