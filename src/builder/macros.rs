//! Macros for declaring state and event enums.

/// Declare a fieldless state enum and implement [`State`](crate::core::State)
/// for it.
///
/// Each variant is given its display and serialized name. The enum also gets
/// `Copy`, `Display` and an `ALL` constant listing every variant in
/// declaration order.
///
/// # Example
///
/// ```
/// use stoplight::core::State;
/// use stoplight::state_enum;
///
/// state_enum! {
///     pub enum Pump {
///         Idle => "idle",
///         Running => "running",
///         Jammed => "jammed",
///     }
///     error: [Jammed]
/// }
///
/// assert_eq!(Pump::Running.name(), "running");
/// assert!(Pump::Jammed.is_error());
/// assert_eq!(Pump::ALL.len(), 3);
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $label:literal
            ),* $(,)?
        }

        $(error: [$($error:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                #[serde(rename = $label)]
                $variant
            ),*
        }

        impl $name {
            /// Every variant, in declaration order.
            #[allow(dead_code)]
            pub const ALL: &'static [$name] = &[$(Self::$variant),*];
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => $label),*
                }
            }

            #[allow(unreachable_patterns)]
            fn is_error(&self) -> bool {
                match self {
                    $($(Self::$error => true,)*)?
                    _ => false,
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::core::State::name(self))
            }
        }
    };
}

/// Declare a fieldless event enum and implement [`Event`](crate::core::Event)
/// for it.
///
/// # Example
///
/// ```
/// use stoplight::core::Event;
/// use stoplight::event_enum;
///
/// event_enum! {
///     pub enum PumpEvent {
///         Start => "START",
///         Stop => "STOP",
///     }
/// }
///
/// assert_eq!(PumpEvent::Stop.name(), "STOP");
/// assert_eq!(PumpEvent::ALL, &[PumpEvent::Start, PumpEvent::Stop]);
/// ```
#[macro_export]
macro_rules! event_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $label:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                #[serde(rename = $label)]
                $variant
            ),*
        }

        impl $name {
            /// Every variant, in declaration order.
            #[allow(dead_code)]
            pub const ALL: &'static [$name] = &[$(Self::$variant),*];
        }

        impl $crate::core::Event for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => $label),*
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::core::Event::name(self))
            }
        }
    };
}
