use rust_embed::RustEmbed;

/// The upload page and its assets, compiled into the binary from `ui/`.
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/ui"]
pub struct Assets;
