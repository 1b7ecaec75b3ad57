//! Panic containment for inbound calls.
//!
//! A panic must never unwind across an `extern "system"` boundary. Every
//! generated trampoline runs the implementation inside [`guard`], which turns
//! a panic into the method's fallback value.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use tracing::error;

/// Run `f`, returning `fallback` if it panics.
#[inline]
pub fn guard<R>(method: &'static str, fallback: R, f: impl FnOnce() -> R) -> R {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(payload) => {
            error!(method, panic = panic_message(&*payload), "inbound call panicked");
            fallback
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "<non-string panic payload>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResultCode;

    #[test]
    fn passes_value_through() {
        assert_eq!(guard("IFoo::getValue", 0, || 7), 7);
    }

    #[test]
    fn panic_becomes_fallback() {
        let code = guard("IBar::setValue", ResultCode::INTERNAL_ERROR, || -> ResultCode {
            panic!("boom")
        });
        assert_eq!(code, ResultCode::INTERNAL_ERROR);
    }

    #[test]
    fn panic_messages() {
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(&*payload), "owned");
        let payload: Box<dyn Any + Send> = Box::new(3u8);
        assert_eq!(panic_message(&*payload), "<non-string panic payload>");
    }
}
