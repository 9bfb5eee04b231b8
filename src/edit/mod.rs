//! Request editing: seeding forms from cached resources, computing update
//! patches, and cleaning edited bodies for the wire.
//!
//! ```text
//! edit/
//! ├── form - RequestForm, RetrieveMode
//! ├── patch - diff, seed_template
//! └── wire - to_wire_json
//! ```

mod form;
mod patch;
mod wire;

pub use form::{RequestForm, RetrieveMode};
pub use patch::{diff, seed_template};
pub use wire::to_wire_json;
