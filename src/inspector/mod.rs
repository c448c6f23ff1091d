//! # Material Inspector
//!
//! GPU- and window-independent model of the debug panel. An
//! [`InspectorPanel`] holds named folders; each folder is bound to one
//! material and holds [`FieldBinding`]s that know how to read a value for
//! display and how to write an edited value back onto the material.
//!
//! Widgets never touch materials directly. They produce [`FieldEdit`]s which
//! [`InspectorPanel::apply`] routes through the field's writer.

pub mod binder;
pub mod field;
pub mod panel;

pub use binder::{add_basic_material_settings, add_specific_material_settings};
pub use field::{BindingContext, FieldBinding, FieldKind, FieldValue, NumberRange};
pub use panel::{FieldEdit, Folder, FolderId, InspectorPanel};
