//! Built-in argument handlers.
//!
//! | Module | Registered at | Literal form |
//! |--------|---------------|--------------|
//! | `scalar` | `string`, `bool`, `char` | `text`, `yes`, `x` |
//! | `number` | `number` | `42`, `0x2a`, `052`, `-1.5` |
//! | `enumeration` | `enum` | a declared variant |
//! | `collection` | `array`, `collection`, `map` | `[a, b]`, `[k -> v]` |
//! | `optional` | `optional` | inner literal or `null` |

mod collection;
mod enumeration;
mod number;
mod optional;
mod scalar;

use std::sync::Arc;

use verba_core::ValueType;

use crate::registry::HandlerRegistry;

pub use collection::{MapHandler, SequenceHandler};
pub use enumeration::EnumHandler;
pub use number::NumberHandler;
pub use optional::OptionalHandler;
pub use scalar::{BoolHandler, CharHandler, StringHandler};

/// Register every built-in handler.
pub(crate) fn install(registry: &mut HandlerRegistry) {
    registry.register(ValueType::String, Arc::new(StringHandler));
    registry.register(ValueType::Bool, Arc::new(BoolHandler));
    registry.register(ValueType::Char, Arc::new(CharHandler));
    registry.register(ValueType::Number, Arc::new(NumberHandler));
    registry.register(ValueType::AnyEnum, Arc::new(EnumHandler));
    registry.register(ValueType::Array, Arc::new(SequenceHandler));
    registry.register(ValueType::Collection, Arc::new(SequenceHandler));
    registry.register(ValueType::Map, Arc::new(MapHandler));
    registry.register(ValueType::Optional, Arc::new(OptionalHandler));
}
