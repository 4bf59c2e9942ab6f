use std::fmt;

/// Where an application is in its host-driven lifecycle.
///
/// ```text
/// Uninitialized --init--> Initialized --display--> Rendering
///                              |   ^reshape            |  ^display/reshape
///                              +------dispose----------+--> Disposed
/// ```
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Lifecycle {
    #[default]
    Uninitialized,
    Initialized,
    Rendering,
    Disposed,
}

/// Callback the runtime is about to invoke.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LifecycleEvent {
    Init,
    Display,
    Reshape,
    Dispose,
}

/// A callback was requested in a state that does not allow it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
#[error("illegal lifecycle transition: {event} while {state}")]
pub struct LifecycleError {
    pub state: Lifecycle,
    pub event: LifecycleEvent,
}

impl Lifecycle {
    /// Returns the state after `event`, or an error if `event` is not allowed now.
    pub fn next(self, event: LifecycleEvent) -> Result<Lifecycle, LifecycleError> {
        use Lifecycle::*;
        use LifecycleEvent::*;

        match (self, event) {
            (Uninitialized, Init) => Ok(Initialized),
            (Initialized | Rendering, Display) => Ok(Rendering),
            (Initialized | Rendering, Reshape) => Ok(self),
            (Initialized | Rendering, Dispose) => Ok(Disposed),
            _ => Err(LifecycleError { state: self, event }),
        }
    }

    /// Applies `event` in place. On error the state is left unchanged.
    pub fn advance(&mut self, event: LifecycleEvent) -> Result<(), LifecycleError> {
        *self = self.next(event)?;
        Ok(())
    }

    #[inline]
    pub fn is_live(self) -> bool {
        matches!(self, Lifecycle::Initialized | Lifecycle::Rendering)
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Lifecycle::Uninitialized => "uninitialized",
            Lifecycle::Initialized => "initialized",
            Lifecycle::Rendering => "rendering",
            Lifecycle::Disposed => "disposed",
        };
        f.write_str(s)
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LifecycleEvent::Init => "init",
            LifecycleEvent::Display => "display",
            LifecycleEvent::Reshape => "reshape",
            LifecycleEvent::Dispose => "dispose",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Lifecycle::*;
    use LifecycleEvent::*;

    #[test]
    fn happy_path() {
        let mut s = Lifecycle::default();
        s.advance(Init).unwrap();
        assert_eq!(s, Initialized);
        s.advance(Reshape).unwrap();
        assert_eq!(s, Initialized);
        s.advance(Display).unwrap();
        s.advance(Display).unwrap();
        assert_eq!(s, Rendering);
        s.advance(Reshape).unwrap();
        assert_eq!(s, Rendering);
        s.advance(Dispose).unwrap();
        assert_eq!(s, Disposed);
    }

    #[test]
    fn dispose_without_display_is_allowed() {
        assert_eq!(Initialized.next(Dispose), Ok(Disposed));
    }

    #[test]
    fn display_before_init_is_rejected() {
        let err = Uninitialized.next(Display).unwrap_err();
        assert_eq!(err, LifecycleError { state: Uninitialized, event: Display });
        assert_eq!(err.to_string(), "illegal lifecycle transition: display while uninitialized");
    }

    #[test]
    fn double_init_is_rejected() {
        assert!(Initialized.next(Init).is_err());
        assert!(Rendering.next(Init).is_err());
    }

    #[test]
    fn disposed_is_terminal() {
        for ev in [Init, Display, Reshape, Dispose] {
            assert!(Disposed.next(ev).is_err());
        }
    }

    #[test]
    fn failed_advance_keeps_state() {
        let mut s = Uninitialized;
        assert!(s.advance(Dispose).is_err());
        assert_eq!(s, Uninitialized);
        assert!(!s.is_live());
    }
}
