//! Macros for declaring mutation and action enums.

/// Declare a mutation enum and implement [`Mutation`](crate::core::Mutation) for it.
///
/// Each variant carries zero or one payload. The generated enum derives
/// `Clone`, `Debug` and `PartialEq`, and `name()` returns the variant name.
///
/// # Example
///
/// ```
/// use flowstate::mutation_enum;
/// use flowstate::core::Mutation;
///
/// mutation_enum! {
///     pub enum CounterMutation {
///         Increment,
///         AddAmount(i64),
///     }
/// }
///
/// assert_eq!(CounterMutation::Increment.name(), "Increment");
/// assert_eq!(CounterMutation::AddAmount(5).name(), "AddAmount");
/// ```
#[macro_export]
macro_rules! mutation_enum {
    ($($body:tt)*) => {
        $crate::__message_enum! { $crate::core::Mutation; $($body)* }
    };
}

/// Declare an action enum and implement [`Action`](crate::core::Action) for it.
///
/// Same shape as [`mutation_enum!`](crate::mutation_enum).
///
/// # Example
///
/// ```
/// use flowstate::action_enum;
/// use flowstate::core::Action;
///
/// action_enum! {
///     pub enum CounterAction {
///         IncrementRandom,
///         FetchRemote(String),
///     }
/// }
///
/// assert_eq!(CounterAction::IncrementRandom.name(), "IncrementRandom");
/// ```
#[macro_export]
macro_rules! action_enum {
    ($($body:tt)*) => {
        $crate::__message_enum! { $crate::core::Action; $($body)* }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __message_enum {
    (
        $kind:path;
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $(($payload:ty))?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant $(($payload))?
            ),*
        }

        impl $kind for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant { .. } => stringify!($variant)),*
                }
            }
        }
    };
}
