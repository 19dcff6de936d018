// embeds the exe metadata from [package.metadata.winres] when building for windows

fn main() {
    if std::env::var("CARGO_CFG_TARGET_OS") .map (|os| os == "windows") .unwrap_or(false) {
        let res = winres::WindowsResource::new();
        if let Err(e) = res.compile() {
            println! ("cargo:warning=could not embed windows resources: {}", e);
        }
    }
}
