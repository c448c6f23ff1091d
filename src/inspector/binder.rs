//! Registers material fields on an inspector panel
//!
//! [`add_basic_material_settings`] binds the fields every material has;
//! [`add_specific_material_settings`] binds the fields of the material's
//! kind. Both create one folder per call.

use crate::{
    error::InspectorError,
    gfx::resources::{
        color::Color,
        material::{Material, MaterialCommon, MaterialKind, Side, StandardParams, VertexColors},
    },
};

use super::{
    field::{
        choice_code, choice_key, BindingContext, ChoiceSet, FieldBinding, FieldKind, FieldValue,
        NumberRange,
    },
    panel::{FolderId, InspectorPanel},
};

pub const SIDE_CHOICES: ChoiceSet = &[("FrontSide", 0), ("BackSide", 1), ("BothSides", 2)];
pub const VERTEX_COLOR_CHOICES: ChoiceSet =
    &[("NoColors", 0), ("FaceColors", 1), ("VertexColors", 2)];

const UNIT_RANGE: NumberRange = NumberRange::new(0.0, 1.0, 0.01);
const SHININESS_RANGE: NumberRange = NumberRange::new(0.0, 100.0, 0.01);

/// Adds a folder with the fields shared by every material kind
///
/// `name` defaults to `"Material"`.
pub fn add_basic_material_settings(
    panel: &mut InspectorPanel,
    material: &Material,
    name: Option<&str>,
) -> FolderId {
    let folder_id = panel.add_folder(name.unwrap_or("Material"), material.id());
    let Some(folder) = panel.folder_mut(folder_id) else {
        return folder_id;
    };

    folder
        .add(FieldBinding::read_only(
            "id",
            FieldKind::Number(None),
            Box::new(|m, _| FieldValue::Number(m.common.id.0 as f64)),
        ))
        .add(FieldBinding::read_only(
            "uuid",
            FieldKind::Text,
            Box::new(|m, _| FieldValue::Text(m.common.uuid.clone())),
        ))
        .add(FieldBinding::editable(
            "name",
            FieldKind::Text,
            Box::new(|m, _| FieldValue::Text(m.common.name.clone())),
            Box::new(|m, value, _| {
                m.common.name = text("name", value)?;
                Ok(())
            }),
        ))
        .add(FieldBinding::editable(
            "opacity",
            FieldKind::Number(Some(UNIT_RANGE)),
            Box::new(|m, _| FieldValue::Number(m.common.opacity as f64)),
            Box::new(|m, value, _| {
                m.common.opacity = number("opacity", value)?;
                Ok(())
            }),
        ))
        .add(flag("transparent", |c| c.transparent, |c, v| c.transparent = v))
        .add(flag("visible", |c| c.visible, |c, v| c.visible = v))
        .add(FieldBinding::editable(
            "side",
            FieldKind::Choice(SIDE_CHOICES),
            Box::new(|m, _| side_value(m.common.side)),
            Box::new(|m, value, _| {
                m.common.side = side("side", value)?;
                Ok(())
            }),
        ))
        .add(flag("color_write", |c| c.color_write, |c, v| c.color_write = v))
        .add(FieldBinding::editable(
            "flat_shading",
            FieldKind::Bool,
            Box::new(|m, _| FieldValue::Bool(m.common.flat_shading)),
            Box::new(|m, value, _| {
                m.common.flat_shading = boolean("flat_shading", value)?;
                // normals are derived differently, rebuild GPU state
                m.common.mark_needs_update();
                Ok(())
            }),
        ))
        .add(flag(
            "premultiplied_alpha",
            |c| c.premultiplied_alpha,
            |c, v| c.premultiplied_alpha = v,
        ))
        .add(flag("dithering", |c| c.dithering, |c, v| c.dithering = v))
        .add(FieldBinding::editable(
            "shadow_side",
            FieldKind::Choice(SIDE_CHOICES),
            Box::new(|m, _| side_value(m.common.shadow_side)),
            Box::new(|m, value, _| {
                m.common.shadow_side = side("shadow_side", value)?;
                Ok(())
            }),
        ))
        .add(FieldBinding::editable(
            "vertex_colors",
            FieldKind::Choice(VERTEX_COLOR_CHOICES),
            Box::new(|m, _| {
                choice_value(VERTEX_COLOR_CHOICES, m.common.vertex_colors.code())
            }),
            Box::new(|m, value, _| {
                let code = parse_choice("vertex_colors", VERTEX_COLOR_CHOICES, value)?;
                m.common.vertex_colors = VertexColors::from_code(code).ok_or_else(|| {
                    InspectorError::InvalidChoiceCode {
                        field: "vertex_colors".to_string(),
                        code,
                    }
                })?;
                Ok(())
            }),
        ))
        .add(flag("fog", |c| c.fog, |c, v| c.fog = v));

    folder_id
}

/// Adds a folder with the fields specific to the material's kind
///
/// `name` defaults to the kind's type name. Kinds without inspector support
/// still get a folder; it is left empty.
pub fn add_specific_material_settings(
    panel: &mut InspectorPanel,
    material: &Material,
    name: Option<&str>,
) -> FolderId {
    let folder_id = panel.add_folder(name.unwrap_or(material.type_name()), material.id());
    let Some(folder) = panel.folder_mut(folder_id) else {
        return folder_id;
    };

    match &material.kind {
        MaterialKind::Normal(_) => {
            folder.add(wireframe());
        }
        MaterialKind::Phong(params) => {
            folder
                .context_mut()
                .set_color("specular", params.specular.style());
            folder
                .add(color_field("specular", |m| match &mut m.kind {
                    MaterialKind::Phong(p) => Some(&mut p.specular),
                    _ => None,
                }))
                .add(FieldBinding::editable(
                    "shininess",
                    FieldKind::Number(Some(SHININESS_RANGE)),
                    Box::new(|m, _| match &m.kind {
                        MaterialKind::Phong(p) => FieldValue::Number(p.shininess as f64),
                        _ => FieldValue::Number(0.0),
                    }),
                    Box::new(|m, value, _| {
                        let shininess = number("shininess", value)?;
                        match &mut m.kind {
                            MaterialKind::Phong(p) => p.shininess = shininess,
                            _ => return Err(kind_mismatch("shininess")),
                        }
                        Ok(())
                    }),
                ));
        }
        MaterialKind::Standard(params) => {
            folder.context_mut().set_color("color", params.color.style());
            folder
                .context_mut()
                .set_color("emissive", params.emissive.style());
            folder
                .add(color_field("color", |m| match &mut m.kind {
                    MaterialKind::Standard(p) => Some(&mut p.color),
                    _ => None,
                }))
                .add(color_field("emissive", |m| match &mut m.kind {
                    MaterialKind::Standard(p) => Some(&mut p.emissive),
                    _ => None,
                }))
                .add(standard_scalar(
                    "metalness",
                    |p| p.metalness,
                    |p, v| p.metalness = v,
                ))
                .add(standard_scalar(
                    "roughness",
                    |p| p.roughness,
                    |p, v| p.roughness = v,
                ))
                .add(wireframe());
        }
        MaterialKind::Basic(_) | MaterialKind::Lambert(_) => {
            log::debug!(
                "No inspector fields for {}; folder '{}' left empty",
                material.type_name(),
                folder.name()
            );
        }
    }

    folder_id
}

fn flag(
    name: &'static str,
    get: fn(&MaterialCommon) -> bool,
    set: fn(&mut MaterialCommon, bool),
) -> FieldBinding {
    FieldBinding::editable(
        name,
        FieldKind::Bool,
        Box::new(move |m, _| FieldValue::Bool(get(&m.common))),
        Box::new(move |m, value, _| {
            set(&mut m.common, boolean(name, value)?);
            Ok(())
        }),
    )
}

fn wireframe() -> FieldBinding {
    FieldBinding::editable(
        "wireframe",
        FieldKind::Bool,
        Box::new(|m, _| FieldValue::Bool(m.wireframe())),
        Box::new(|m, value, _| {
            *m.wireframe_mut() = boolean("wireframe", value)?;
            Ok(())
        }),
    )
}

fn standard_scalar(
    name: &'static str,
    get: fn(&StandardParams) -> f32,
    set: fn(&mut StandardParams, f32),
) -> FieldBinding {
    FieldBinding::editable(
        name,
        FieldKind::Number(Some(UNIT_RANGE)),
        Box::new(move |m, _| match &m.kind {
            MaterialKind::Standard(p) => FieldValue::Number(get(p) as f64),
            _ => FieldValue::Number(0.0),
        }),
        Box::new(move |m, value, _| {
            let v = number(name, value)?;
            match &mut m.kind {
                MaterialKind::Standard(p) => set(p, v),
                _ => return Err(kind_mismatch(name)),
            }
            Ok(())
        }),
    )
}

/// Color field using the scratch round trip: the widget edits the style
/// string held in the folder context, the writer decodes it into the
/// material's native color.
fn color_field(
    name: &'static str,
    access: fn(&mut Material) -> Option<&mut Color>,
) -> FieldBinding {
    FieldBinding::editable(
        name,
        FieldKind::Color,
        Box::new(move |_, ctx: &BindingContext| {
            FieldValue::Color(ctx.color(name).unwrap_or("#000000").to_string())
        }),
        Box::new(move |m, value, ctx| {
            let FieldValue::Color(style) = value else {
                return Err(InspectorError::TypeMismatch {
                    field: name.to_string(),
                    expected: "color",
                });
            };
            let decoded: Color = style
                .parse()
                .map_err(|source| InspectorError::InvalidColor {
                    field: name.to_string(),
                    source,
                })?;
            let target = access(m).ok_or_else(|| kind_mismatch(name))?;
            *target = decoded;
            ctx.set_color(name, style);
            Ok(())
        }),
    )
}

fn side(field: &str, value: FieldValue) -> Result<Side, InspectorError> {
    let code = parse_choice(field, SIDE_CHOICES, value)?;
    Side::from_code(code).ok_or_else(|| InspectorError::InvalidChoiceCode {
        field: field.to_string(),
        code,
    })
}

fn side_value(side: Side) -> FieldValue {
    choice_value(SIDE_CHOICES, side.code())
}

fn choice_value(choices: ChoiceSet, code: i32) -> FieldValue {
    FieldValue::Choice(choice_key(choices, code).unwrap_or_default().to_string())
}

/// Parses a choice key back to the integer code it stands for
fn parse_choice(field: &str, choices: ChoiceSet, value: FieldValue) -> Result<i32, InspectorError> {
    match value {
        FieldValue::Choice(key) => {
            choice_code(choices, &key).ok_or_else(|| InspectorError::UnknownChoice {
                field: field.to_string(),
                key,
            })
        }
        _ => Err(InspectorError::TypeMismatch {
            field: field.to_string(),
            expected: "choice",
        }),
    }
}

fn number(field: &str, value: FieldValue) -> Result<f32, InspectorError> {
    match value {
        FieldValue::Number(v) => Ok(v as f32),
        _ => Err(InspectorError::TypeMismatch {
            field: field.to_string(),
            expected: "number",
        }),
    }
}

fn boolean(field: &str, value: FieldValue) -> Result<bool, InspectorError> {
    match value {
        FieldValue::Bool(v) => Ok(v),
        _ => Err(InspectorError::TypeMismatch {
            field: field.to_string(),
            expected: "bool",
        }),
    }
}

fn text(field: &str, value: FieldValue) -> Result<String, InspectorError> {
    match value {
        FieldValue::Text(v) => Ok(v),
        _ => Err(InspectorError::TypeMismatch {
            field: field.to_string(),
            expected: "text",
        }),
    }
}

fn kind_mismatch(field: &str) -> InspectorError {
    InspectorError::TypeMismatch {
        field: field.to_string(),
        expected: "material of the bound kind",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        gfx::resources::material::{
            BasicParams, LambertParams, MaterialId, MaterialManager, PhongParams,
        },
        inspector::panel::FieldEdit,
    };
    use approx::assert_relative_eq;

    fn setup(material: Material) -> (MaterialManager, MaterialId, InspectorPanel) {
        let mut materials = MaterialManager::new();
        let id = materials.add_material(material);
        (materials, id, InspectorPanel::new())
    }

    fn edit(
        panel: &mut InspectorPanel,
        materials: &mut MaterialManager,
        folder: FolderId,
        field: &str,
        value: FieldValue,
    ) -> Result<(), InspectorError> {
        panel.apply(FieldEdit::new(folder, field, value), materials)
    }

    #[test]
    fn test_basic_settings_register_common_fields_in_order() {
        let (materials, id, mut panel) = setup(Material::normal());
        let folder =
            add_basic_material_settings(&mut panel, materials.get_material(id).unwrap(), None);
        let folder = panel.folder(folder).unwrap();

        assert_eq!(folder.name(), "Material");
        assert_eq!(
            folder.field_names(),
            vec![
                "id",
                "uuid",
                "name",
                "opacity",
                "transparent",
                "visible",
                "side",
                "color_write",
                "flat_shading",
                "premultiplied_alpha",
                "dithering",
                "shadow_side",
                "vertex_colors",
                "fog",
            ]
        );
        assert!(folder.field("id").unwrap().is_read_only());
        assert!(folder.field("uuid").unwrap().is_read_only());
        assert!(!folder.field("name").unwrap().is_read_only());
    }

    #[test]
    fn test_specific_settings_per_kind() {
        let cases = [
            (Material::normal(), vec!["wireframe"]),
            (
                Material::phong(PhongParams::default()),
                vec!["specular", "shininess"],
            ),
            (
                Material::standard(StandardParams::default()),
                vec!["color", "emissive", "metalness", "roughness", "wireframe"],
            ),
        ];

        for (material, expected) in cases {
            let type_name = material.type_name();
            let (materials, id, mut panel) = setup(material);
            let folder = add_specific_material_settings(
                &mut panel,
                materials.get_material(id).unwrap(),
                None,
            );
            let folder = panel.folder(folder).unwrap();
            assert_eq!(folder.name(), type_name);
            assert_eq!(folder.field_names(), expected);
        }
    }

    #[test]
    fn test_unrecognized_kinds_get_empty_folder() {
        for material in [
            Material::basic(BasicParams::default()),
            Material::lambert(LambertParams::default()),
        ] {
            let (materials, id, mut panel) = setup(material);
            let folder = add_specific_material_settings(
                &mut panel,
                materials.get_material(id).unwrap(),
                Some("plain"),
            );
            let folder = panel.folder(folder).expect("folder handle stays valid");
            assert_eq!(folder.name(), "plain");
            assert!(folder.is_empty());
        }
    }

    #[test]
    fn test_side_choice_parses_to_code() {
        let (mut materials, id, mut panel) = setup(Material::normal());
        let folder =
            add_basic_material_settings(&mut panel, materials.get_material(id).unwrap(), None);

        for (key, code) in [("BackSide", 1), ("FrontSide", 0), ("BothSides", 2)] {
            edit(
                &mut panel,
                &mut materials,
                folder,
                "side",
                FieldValue::Choice(key.into()),
            )
            .unwrap();
            assert_eq!(materials.get_material(id).unwrap().common.side.code(), code);
            assert_eq!(
                panel.read(folder, "side", &materials).unwrap(),
                FieldValue::Choice(key.into())
            );
        }

        let err = edit(
            &mut panel,
            &mut materials,
            folder,
            "side",
            FieldValue::Choice("Sideways".into()),
        )
        .unwrap_err();
        assert!(matches!(err, InspectorError::UnknownChoice { .. }));
        assert_eq!(materials.get_material(id).unwrap().common.side, Side::Both);
    }

    #[test]
    fn test_vertex_colors_and_shadow_side() {
        let (mut materials, id, mut panel) = setup(Material::normal());
        let folder =
            add_basic_material_settings(&mut panel, materials.get_material(id).unwrap(), None);

        edit(
            &mut panel,
            &mut materials,
            folder,
            "vertex_colors",
            FieldValue::Choice("VertexColors".into()),
        )
        .unwrap();
        edit(
            &mut panel,
            &mut materials,
            folder,
            "shadow_side",
            FieldValue::Choice("BackSide".into()),
        )
        .unwrap();

        let common = &materials.get_material(id).unwrap().common;
        assert_eq!(common.vertex_colors, VertexColors::Vertex);
        assert_eq!(common.shadow_side, Side::Back);
    }

    #[test]
    fn test_flat_shading_marks_needs_update() {
        let (mut materials, id, mut panel) = setup(Material::normal());
        let folder =
            add_basic_material_settings(&mut panel, materials.get_material(id).unwrap(), None);
        let before = materials.get_material(id).unwrap().common.version();

        edit(
            &mut panel,
            &mut materials,
            folder,
            "flat_shading",
            FieldValue::Bool(true),
        )
        .unwrap();

        let common = &materials.get_material(id).unwrap().common;
        assert!(common.flat_shading);
        assert_eq!(common.version(), before + 1);
    }

    #[test]
    fn test_identity_fields_are_read_only() {
        let (mut materials, id, mut panel) = setup(Material::normal().with_name("stone"));
        let folder =
            add_basic_material_settings(&mut panel, materials.get_material(id).unwrap(), None);

        let err = edit(
            &mut panel,
            &mut materials,
            folder,
            "uuid",
            FieldValue::Text("nope".into()),
        )
        .unwrap_err();
        assert_eq!(err, InspectorError::ReadOnly("uuid".into()));

        edit(
            &mut panel,
            &mut materials,
            folder,
            "name",
            FieldValue::Text("granite".into()),
        )
        .unwrap();
        assert_eq!(materials.get_material(id).unwrap().common.name, "granite");
        assert_eq!(
            panel.read(folder, "id", &materials).unwrap(),
            FieldValue::Number(0.0)
        );
    }

    #[test]
    fn test_specular_color_round_trip() {
        let (mut materials, id, mut panel) = setup(Material::phong(PhongParams::default()));
        let folder =
            add_specific_material_settings(&mut panel, materials.get_material(id).unwrap(), None);

        assert_eq!(
            panel.read(folder, "specular", &materials).unwrap(),
            FieldValue::Color("#111111".into())
        );

        edit(
            &mut panel,
            &mut materials,
            folder,
            "specular",
            FieldValue::Color("#ff0000".into()),
        )
        .unwrap();

        let MaterialKind::Phong(params) = &materials.get_material(id).unwrap().kind else {
            panic!("expected phong material");
        };
        assert_eq!(params.specular, Color::new(1.0, 0.0, 0.0));
        assert_eq!(
            panel.read(folder, "specular", &materials).unwrap(),
            FieldValue::Color("#ff0000".into())
        );
    }

    #[test]
    fn test_malformed_color_keeps_prior_value() {
        let (mut materials, id, mut panel) = setup(Material::standard(StandardParams::default()));
        let folder =
            add_specific_material_settings(&mut panel, materials.get_material(id).unwrap(), None);

        let err = edit(
            &mut panel,
            &mut materials,
            folder,
            "emissive",
            FieldValue::Color("#zz0000".into()),
        )
        .unwrap_err();
        assert!(matches!(err, InspectorError::InvalidColor { .. }));
        assert_eq!(
            materials.get_material(id).unwrap().emissive(),
            Color::BLACK
        );
        assert_eq!(
            panel.read(folder, "emissive", &materials).unwrap(),
            FieldValue::Color("#000000".into())
        );
    }

    #[test]
    fn test_roughness_is_clamped_to_range() {
        let (mut materials, id, mut panel) = setup(Material::standard(StandardParams::default()));
        let folder =
            add_specific_material_settings(&mut panel, materials.get_material(id).unwrap(), None);

        edit(
            &mut panel,
            &mut materials,
            folder,
            "roughness",
            FieldValue::Number(1.5),
        )
        .unwrap();

        let MaterialKind::Standard(params) = &materials.get_material(id).unwrap().kind else {
            panic!("expected standard material");
        };
        assert_relative_eq!(params.roughness, 1.0);
    }

    #[test]
    fn test_shininess_written_directly() {
        let (mut materials, id, mut panel) = setup(Material::phong(PhongParams::default()));
        let folder =
            add_specific_material_settings(&mut panel, materials.get_material(id).unwrap(), None);

        edit(
            &mut panel,
            &mut materials,
            folder,
            "shininess",
            FieldValue::Number(64.5),
        )
        .unwrap();
        edit(
            &mut panel,
            &mut materials,
            folder,
            "shininess",
            FieldValue::Number(250.0),
        )
        .unwrap();

        let MaterialKind::Phong(params) = &materials.get_material(id).unwrap().kind else {
            panic!("expected phong material");
        };
        assert_relative_eq!(params.shininess, 100.0);
    }

    #[test]
    fn test_folders_do_not_share_color_scratch() {
        let mut materials = MaterialManager::new();
        let red = materials.add_material(Material::standard(StandardParams {
            color: Color::from_hex(0xff0000),
            ..Default::default()
        }));
        let blue = materials.add_material(Material::standard(StandardParams {
            color: Color::from_hex(0x0000ff),
            ..Default::default()
        }));
        let mut panel = InspectorPanel::new();
        let red_folder =
            add_specific_material_settings(&mut panel, materials.get_material(red).unwrap(), None);
        let blue_folder =
            add_specific_material_settings(&mut panel, materials.get_material(blue).unwrap(), None);

        edit(
            &mut panel,
            &mut materials,
            blue_folder,
            "color",
            FieldValue::Color("#00ff00".into()),
        )
        .unwrap();

        assert_eq!(
            panel.read(red_folder, "color", &materials).unwrap(),
            FieldValue::Color("#ff0000".into())
        );
        assert_eq!(materials.get_material(red).unwrap().color(), Some(Color::from_hex(0xff0000)));
        assert_eq!(
            materials.get_material(blue).unwrap().color(),
            Some(Color::from_hex(0x00ff00))
        );
    }
}
