use std::panic::{self, AssertUnwindSafe};

/// Run `f`, turning a panic into an error message instead of unwinding
/// through the event loop.
pub fn guard<F: FnOnce()>(f: F) -> Result<(), String> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        if let Some(msg) = payload.downcast_ref::<&str>() {
            msg.to_string()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "unknown fault".to_string()
        }
    })
}
