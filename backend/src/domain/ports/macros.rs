//! `define_port_error!` declares the error enum of a driven port.
//!
//! Variants are written `Name => "display"` or `Name { field: Type } =>
//! "display {field}"`. The enum derives `thiserror::Error` and gains one
//! snake_case constructor per variant, each field taking `impl Into<Type>`:
//! `TransportError::throttled(Some(wait))`, `EventRepositoryError::query("..")`.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:literal
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field: $ty),* } )?,
            )*
        }

        ::paste::paste! {
            impl $name {
                $(
                    pub fn [<$variant:snake>]($($($field: impl Into<$ty>),*)?) -> Self {
                        Self::$variant { $($($field: $field.into()),*)? }
                    }
                )*
            }
        }
    };
}

pub(crate) use define_port_error;
