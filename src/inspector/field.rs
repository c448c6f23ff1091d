//! Field bindings: what a panel widget edits and how edits reach the material

use std::collections::BTreeMap;

use crate::{error::InspectorError, gfx::resources::material::Material};

/// Numeric bounds enforced on edits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberRange {
    pub min: f64,
    pub max: f64,
    pub step: Option<f64>,
}

impl NumberRange {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self {
            min,
            max,
            step: Some(step),
        }
    }

    /// Clamps `value` into `[min, max]` and snaps it to the step grid
    pub fn constrain(&self, value: f64) -> f64 {
        let clamped = value.clamp(self.min, self.max);
        match self.step {
            Some(step) if step > 0.0 => {
                let snapped = (clamped / step).round() * step;
                snapped.clamp(self.min, self.max)
            }
            _ => clamped,
        }
    }
}

/// Named integer codes offered by a choice widget
pub type ChoiceSet = &'static [(&'static str, i32)];

/// Looks up the integer code behind a choice key
pub fn choice_code(choices: ChoiceSet, key: &str) -> Option<i32> {
    choices
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, code)| *code)
}

/// Looks up the choice key for an integer code
pub fn choice_key(choices: ChoiceSet, code: i32) -> Option<&'static str> {
    choices
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(name, _)| *name)
}

/// Widget kind for a field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Number(Option<NumberRange>),
    Bool,
    Text,
    Choice(ChoiceSet),
    Color,
}

impl FieldKind {
    pub fn value_name(&self) -> &'static str {
        match self {
            FieldKind::Number(_) => "number",
            FieldKind::Bool => "bool",
            FieldKind::Text => "text",
            FieldKind::Choice(_) => "choice",
            FieldKind::Color => "color",
        }
    }

    pub fn accepts(&self, value: &FieldValue) -> bool {
        matches!(
            (self, value),
            (FieldKind::Number(_), FieldValue::Number(_))
                | (FieldKind::Bool, FieldValue::Bool(_))
                | (FieldKind::Text, FieldValue::Text(_))
                | (FieldKind::Choice(_), FieldValue::Choice(_))
                | (FieldKind::Color, FieldValue::Color(_))
        )
    }
}

/// Value transported between a widget and a binding
///
/// Choices travel as their key and colors as style strings, the same way the
/// widgets present them.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Bool(bool),
    Text(String),
    Choice(String),
    Color(String),
}

/// Per-folder scratch state
///
/// Color widgets observe the scratch string stored here rather than the live
/// material, so a rejected edit leaves the widget showing the last good value.
#[derive(Debug, Clone, Default)]
pub struct BindingContext {
    colors: BTreeMap<&'static str, String>,
}

impl BindingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color(&self, key: &str) -> Option<&str> {
        self.colors.get(key).map(String::as_str)
    }

    pub fn set_color(&mut self, key: &'static str, style: String) {
        self.colors.insert(key, style);
    }
}

pub type ReadFn = Box<dyn Fn(&Material, &BindingContext) -> FieldValue>;
pub type WriteFn =
    Box<dyn Fn(&mut Material, FieldValue, &mut BindingContext) -> Result<(), InspectorError>>;

/// One editable (or display-only) field in a folder
pub struct FieldBinding {
    pub name: &'static str,
    pub kind: FieldKind,
    read: ReadFn,
    write: Option<WriteFn>,
}

impl FieldBinding {
    /// A field the widget may change
    pub fn editable(name: &'static str, kind: FieldKind, read: ReadFn, write: WriteFn) -> Self {
        Self {
            name,
            kind,
            read,
            write: Some(write),
        }
    }

    /// A display-only field
    pub fn read_only(name: &'static str, kind: FieldKind, read: ReadFn) -> Self {
        Self {
            name,
            kind,
            read,
            write: None,
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.write.is_none()
    }

    pub fn read(&self, material: &Material, context: &BindingContext) -> FieldValue {
        (self.read)(material, context)
    }

    /// Validates `value` against the field kind, applies range constraints and
    /// hands it to the writer
    pub fn write(
        &self,
        material: &mut Material,
        value: FieldValue,
        context: &mut BindingContext,
    ) -> Result<(), InspectorError> {
        let write = self
            .write
            .as_ref()
            .ok_or_else(|| InspectorError::ReadOnly(self.name.to_string()))?;

        if !self.kind.accepts(&value) {
            return Err(self.mismatch());
        }

        let value = match (self.kind, value) {
            (FieldKind::Number(_), FieldValue::Number(v)) if !v.is_finite() => {
                return Err(self.mismatch());
            }
            (FieldKind::Number(Some(range)), FieldValue::Number(v)) => {
                FieldValue::Number(range.constrain(v))
            }
            (_, value) => value,
        };

        write(material, value, context)
    }

    fn mismatch(&self) -> InspectorError {
        InspectorError::TypeMismatch {
            field: self.name.to_string(),
            expected: self.kind.value_name(),
        }
    }
}

impl std::fmt::Debug for FieldBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldBinding")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("read_only", &self.is_read_only())
            .finish()
    }
}
