//! `p4x version` -- print version, build info, and platform.

use anyhow::Result;

use super::FlowOutcome;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Version string, from the workspace version in Cargo.toml.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build identifier. Can be overridden via environment variable at build time.
const BUILD: &str = {
    match option_env!("P4X_BUILD") {
        Some(b) => b,
        None => "dev",
    }
};

/// Execute the `p4x version` command.
pub fn run(ctx: &RuntimeContext) -> Result<FlowOutcome> {
    let os = std::env::consts::OS;
    let arch = std::env::consts::ARCH;

    if ctx.json {
        let info = serde_json::json!({
            "version": VERSION,
            "build": BUILD,
            "executable": ctx.dispatcher.executable(),
            "os": os,
            "arch": arch,
        });
        output_json(&info);
    } else {
        println!(
            "p4x version {} ({}) {}/{} using {}",
            VERSION,
            BUILD,
            os,
            arch,
            ctx.dispatcher.executable()
        );
    }

    Ok(FlowOutcome::Completed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_constants_exist() {
        assert!(!VERSION.is_empty());
        assert!(!BUILD.is_empty());
    }
}
