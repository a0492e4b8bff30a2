//! Best-effort copy to the system clipboard.
//!
//! Two mechanisms are available:
//!
//! - **System clipboard** through `copypasta` (X11/Wayland, macOS, Windows).
//! - **Helper process**: a clipboard utility (`wl-copy`, `xclip`, `xsel`,
//!   `pbcopy`, `clip`) receives the text on stdin. The child is always
//!   reaped, whether or not the copy succeeded.
//!
//! The second is tried only if the first is unavailable or fails. Which one
//! goes first depends on the platform, see [`preferred_order`].
//!
//! [`copy_to_clipboard`] returns `true` on success and never panics or
//! returns an error; failures of either path are logged.

use std::io::Write;
use std::process::{Child, Command, Stdio};

use anyhow::{anyhow, bail, Context, Result};
use copypasta::{ClipboardContext, ClipboardProvider};
use tracing::{debug, warn};

/// Something that can receive clipboard text.
pub trait ClipboardSink {
    fn name(&self) -> &str;
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// The platform clipboard via `copypasta`.
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn name(&self) -> &str {
        "system clipboard"
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        let mut ctx =
            ClipboardContext::new().map_err(|e| anyhow!("clipboard unavailable: {}", e))?;
        ctx.set_contents(text.to_string())
            .map_err(|e| anyhow!("clipboard write failed: {}", e))
    }
}

/// An external program that reads clipboard text from stdin.
#[derive(Debug, Clone)]
pub struct HelperCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl HelperCommand {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Clipboard helper programs, tried in order until one succeeds.
pub struct CommandClipboard {
    candidates: Vec<HelperCommand>,
}

impl CommandClipboard {
    /// The helpers usually available on this platform.
    pub fn platform_default() -> Self {
        let candidates = if cfg!(target_os = "macos") {
            vec![HelperCommand::new("pbcopy", &[])]
        } else if cfg!(target_os = "windows") {
            vec![HelperCommand::new("clip", &[])]
        } else {
            let mut c = Vec::new();
            if std::env::var_os("WAYLAND_DISPLAY").is_some() {
                c.push(HelperCommand::new("wl-copy", &[]));
            }
            c.push(HelperCommand::new("xclip", &["-selection", "clipboard"]));
            c.push(HelperCommand::new("xsel", &["--clipboard", "--input"]));
            c
        };
        Self { candidates }
    }

    pub fn with_candidates(candidates: Vec<HelperCommand>) -> Self {
        Self { candidates }
    }
}

impl ClipboardSink for CommandClipboard {
    fn name(&self) -> &str {
        "clipboard helper"
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        let mut last_err = None;
        for helper in &self.candidates {
            match run_helper(helper, text) {
                Ok(()) => {
                    debug!(program = %helper.program, "copied via helper");
                    return Ok(());
                }
                Err(e) => {
                    debug!(program = %helper.program, error = %e, "helper failed");
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| anyhow!("no clipboard helper configured")))
    }
}

/// Kills and reaps the child on drop unless it was already waited on.
struct ReapGuard(Option<Child>);

impl ReapGuard {
    fn child(&mut self) -> Option<&mut Child> {
        self.0.as_mut()
    }

    fn wait(mut self) -> Result<std::process::ExitStatus> {
        let mut child = self
            .0
            .take()
            .ok_or_else(|| anyhow!("helper process already reaped"))?;
        Ok(child.wait()?)
    }
}

impl Drop for ReapGuard {
    fn drop(&mut self) {
        if let Some(mut child) = self.0.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

fn run_helper(helper: &HelperCommand, text: &str) -> Result<()> {
    let child = Command::new(&helper.program)
        .args(&helper.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to start {}", helper.program))?;
    let mut guard = ReapGuard(Some(child));

    {
        let stdin = guard
            .child()
            .and_then(|c| c.stdin.as_mut())
            .ok_or_else(|| anyhow!("{} has no stdin", helper.program))?;
        stdin
            .write_all(text.as_bytes())
            .with_context(|| format!("failed to write to {}", helper.program))?;
    }
    // Close stdin so the helper sees EOF.
    if let Some(child) = guard.child() {
        drop(child.stdin.take());
    }

    let status = guard.wait()?;
    if !status.success() {
        bail!("{} exited with {}", helper.program, status);
    }
    Ok(())
}

/// Try `primary`, then `fallback`. Returns whether either succeeded.
pub fn copy_with(
    primary: &mut dyn ClipboardSink,
    fallback: &mut dyn ClipboardSink,
    text: &str,
) -> bool {
    match primary.write_text(text) {
        Ok(()) => return true,
        Err(e) => warn!(method = primary.name(), error = %e, "copy failed; trying fallback"),
    }
    match fallback.write_text(text) {
        Ok(()) => true,
        Err(e) => {
            warn!(method = fallback.name(), error = %e, "fallback copy failed");
            false
        }
    }
}

/// Which mechanism [`copy_to_clipboard`] tries first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOrder {
    SystemFirst,
    HelperFirst,
}

/// On X11 and Wayland a selection is served by its owning process, and
/// `copypasta` owns it only until `tone` exits. `xclip`, `xsel`, and
/// `wl-copy` keep serving it afterwards, so they go first there.
pub fn preferred_order() -> CopyOrder {
    if cfg!(all(unix, not(target_os = "macos"))) {
        CopyOrder::HelperFirst
    } else {
        CopyOrder::SystemFirst
    }
}

/// Copy through `system` and `helper` in the given order.
pub fn copy_in_order(
    order: CopyOrder,
    system: &mut dyn ClipboardSink,
    helper: &mut dyn ClipboardSink,
    text: &str,
) -> bool {
    match order {
        CopyOrder::SystemFirst => copy_with(system, helper, text),
        CopyOrder::HelperFirst => copy_with(helper, system, text),
    }
}

/// Copy `text` to the clipboard using the best available mechanism.
pub fn copy_to_clipboard(text: &str) -> bool {
    copy_in_order(
        preferred_order(),
        &mut SystemClipboard,
        &mut CommandClipboard::platform_default(),
        text,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recording {
        fail: bool,
        received: Vec<String>,
    }

    impl Recording {
        fn ok() -> Self {
            Self {
                fail: false,
                received: Vec::new(),
            }
        }
        fn failing() -> Self {
            Self {
                fail: true,
                received: Vec::new(),
            }
        }
    }

    impl ClipboardSink for Recording {
        fn name(&self) -> &str {
            "recording"
        }
        fn write_text(&mut self, text: &str) -> Result<()> {
            self.received.push(text.to_string());
            if self.fail {
                bail!("denied");
            }
            Ok(())
        }
    }

    #[test]
    fn test_primary_success_skips_fallback() {
        let mut primary = Recording::ok();
        let mut fallback = Recording::ok();
        assert!(copy_with(&mut primary, &mut fallback, "hello"));
        assert_eq!(primary.received, vec!["hello"]);
        assert!(fallback.received.is_empty());
    }

    #[test]
    fn test_fallback_used_when_primary_fails() {
        let mut primary = Recording::failing();
        let mut fallback = Recording::ok();
        assert!(copy_with(&mut primary, &mut fallback, "hello"));
        assert_eq!(fallback.received, vec!["hello"]);
    }

    #[test]
    fn test_both_fail_returns_false() {
        let mut primary = Recording::failing();
        let mut fallback = Recording::failing();
        assert!(!copy_with(&mut primary, &mut fallback, "hello"));
    }

    #[test]
    fn test_missing_helper_fails_cleanly() {
        let mut helper = CommandClipboard::with_candidates(vec![HelperCommand::new(
            "tonecheck-no-such-clipboard-helper",
            &[],
        )]);
        assert!(helper.write_text("x").is_err());
    }

    #[test]
    fn test_empty_candidate_list_fails() {
        let mut helper = CommandClipboard::with_candidates(Vec::new());
        assert!(helper.write_text("x").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_helper_receives_stdin() {
        let mut helper = CommandClipboard::with_candidates(vec![
            HelperCommand::new("tonecheck-no-such-clipboard-helper", &[]),
            HelperCommand::new("cat", &[]),
        ]);
        assert!(helper.write_text("copied text").is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_helper_nonzero_exit_is_failure() {
        let mut helper = CommandClipboard::with_candidates(vec![HelperCommand::new("false", &[])]);
        assert!(helper.write_text("x").is_err());
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    #[test]
    fn test_helpers_first_on_x11_and_wayland() {
        assert_eq!(preferred_order(), CopyOrder::HelperFirst);
    }

    #[cfg(any(target_os = "macos", windows))]
    #[test]
    fn test_system_clipboard_first_on_macos_and_windows() {
        assert_eq!(preferred_order(), CopyOrder::SystemFirst);
    }

    #[test]
    fn test_helper_first_skips_system_on_success() {
        let mut system = Recording::ok();
        let mut helper = Recording::ok();
        assert!(copy_in_order(CopyOrder::HelperFirst, &mut system, &mut helper, "hi"));
        assert_eq!(helper.received, vec!["hi"]);
        assert!(system.received.is_empty());
    }

    #[test]
    fn test_helper_first_falls_back_to_system() {
        let mut system = Recording::ok();
        let mut helper = Recording::failing();
        assert!(copy_in_order(CopyOrder::HelperFirst, &mut system, &mut helper, "hi"));
        assert_eq!(system.received, vec!["hi"]);
    }

    #[test]
    fn test_system_first_order() {
        let mut system = Recording::ok();
        let mut helper = Recording::ok();
        assert!(copy_in_order(CopyOrder::SystemFirst, &mut system, &mut helper, "hi"));
        assert_eq!(system.received, vec!["hi"]);
        assert!(helper.received.is_empty());
    }
}
