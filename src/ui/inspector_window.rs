// src/ui/inspector_window.rs
//! ImGui rendition of the material inspector
//!
//! Draws one collapsing header per folder and turns widget changes into
//! [`FieldEdit`]s. Nothing here mutates materials; the caller applies the
//! returned edits once the frame is drawn.

use imgui::{Condition, TreeNodeFlags};

use crate::{
    gfx::{resources::color::Color, scene::Scene},
    inspector::{
        field::ChoiceSet,
        FieldBinding, FieldEdit, FieldKind, FieldValue, FolderId, InspectorPanel,
    },
};

pub const INSPECTOR_TITLE: &str = "Inspector";

/// Draws the inspector window and returns the edits made this frame
pub fn inspector_window(ui: &imgui::Ui, panel: &InspectorPanel, scene: &Scene) -> Vec<FieldEdit> {
    let mut edits = Vec::new();

    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return edits;
    }
    let panel_width = (display_size[0] * 0.3).clamp(320.0, 460.0);

    ui.window(INSPECTOR_TITLE)
        .size(
            [panel_width, display_size[1] * 0.9],
            Condition::FirstUseEver,
        )
        .position(
            [display_size[0] - panel_width - 16.0, 16.0],
            Condition::FirstUseEver,
        )
        .resizable(true)
        .collapsible(true)
        .build(|| {
            let stats = scene.get_statistics();
            ui.text(format!(
                "{} objects  {} triangles  {:.0} fps",
                stats.object_count,
                stats.total_triangles,
                ui.io().framerate
            ));
            ui.separator();

            for (folder_id, folder) in panel.folders() {
                let header = format!("{}##folder{}", folder.name(), folder_id.0);
                if !ui.collapsing_header(&header, TreeNodeFlags::DEFAULT_OPEN) {
                    continue;
                }
                if folder.is_empty() {
                    ui.text_disabled("(no fields)");
                    continue;
                }

                for field in folder.fields() {
                    match panel.read(folder_id, field.name, &scene.material_manager) {
                        Ok(value) => {
                            if let Some(edited) = field_widget(ui, folder_id, field, value) {
                                edits.push(FieldEdit::new(folder_id, field.name, edited));
                            }
                        }
                        Err(e) => ui.text_disabled(format!("{}: {}", field.name, e)),
                    }
                }
            }
        });

    edits
}

/// Draws the widget for one field; returns the new value if it changed
fn field_widget(
    ui: &imgui::Ui,
    folder: FolderId,
    field: &FieldBinding,
    value: FieldValue,
) -> Option<FieldValue> {
    let label = format!("{}##{}", field.name, folder.0);
    if field.is_read_only() {
        ui.label_text(&label, display_text(&value));
        return None;
    }

    match (field.kind, value) {
        (FieldKind::Number(Some(range)), FieldValue::Number(current)) => {
            let mut v = current as f32;
            ui.slider_config(&label, range.min as f32, range.max as f32)
                .display_format("%.2f")
                .build(&mut v)
                .then(|| FieldValue::Number(v as f64))
        }
        (FieldKind::Number(None), FieldValue::Number(current)) => {
            let mut v = current as f32;
            ui.input_float(&label, &mut v)
                .build()
                .then(|| FieldValue::Number(v as f64))
        }
        (FieldKind::Bool, FieldValue::Bool(mut checked)) => ui
            .checkbox(&label, &mut checked)
            .then(|| FieldValue::Bool(checked)),
        (FieldKind::Text, FieldValue::Text(mut text)) => ui
            .input_text(&label, &mut text)
            .build()
            .then(|| FieldValue::Text(text)),
        (FieldKind::Choice(choices), FieldValue::Choice(key)) => {
            let names: Vec<&str> = choices.iter().map(|(name, _)| *name).collect();
            let mut index = choice_index(choices, &key);
            if ui.combo_simple_string(&label, &mut index, &names) {
                names
                    .get(index)
                    .map(|name| FieldValue::Choice(name.to_string()))
            } else {
                None
            }
        }
        (FieldKind::Color, FieldValue::Color(style)) => {
            let mut rgb = style_to_rgb(&style);
            ui.color_edit3(&label, &mut rgb)
                .then(|| FieldValue::Color(rgb_to_style(rgb)))
        }
        (_, other) => {
            ui.label_text(&label, display_text(&other));
            None
        }
    }
}

/// Position of `key` in the choice list, the first entry if absent
fn choice_index(choices: ChoiceSet, key: &str) -> usize {
    choices
        .iter()
        .position(|(name, _)| *name == key)
        .unwrap_or(0)
}

fn style_to_rgb(style: &str) -> [f32; 3] {
    style
        .parse::<Color>()
        .map(|color| color.to_array())
        .unwrap_or([0.0; 3])
}

fn rgb_to_style(rgb: [f32; 3]) -> String {
    Color::from_array(rgb).style()
}

fn display_text(value: &FieldValue) -> String {
    match value {
        FieldValue::Number(v) => format!("{}", v),
        FieldValue::Bool(b) => b.to_string(),
        FieldValue::Text(s) | FieldValue::Choice(s) | FieldValue::Color(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspector::binder::SIDE_CHOICES as SIDES;

    #[test]
    fn test_choice_index_falls_back_to_first() {
        assert_eq!(choice_index(SIDES, "BothSides"), 2);
        assert_eq!(choice_index(SIDES, "Sideways"), 0);
    }

    #[test]
    fn test_color_widget_conversion() {
        assert_eq!(style_to_rgb("#ff0000"), [1.0, 0.0, 0.0]);
        assert_eq!(style_to_rgb("not a color"), [0.0; 3]);
        assert_eq!(rgb_to_style([0.0, 1.0, 0.0]), "#00ff00");
    }

    #[test]
    fn test_display_text() {
        assert_eq!(display_text(&FieldValue::Number(3.0)), "3");
        assert_eq!(display_text(&FieldValue::Bool(true)), "true");
        assert_eq!(
            display_text(&FieldValue::Text("3f2a".to_string())),
            "3f2a"
        );
    }
}
