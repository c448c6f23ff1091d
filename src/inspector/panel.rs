//! Inspector panel: folders of field bindings and the edit commands that
//! drive them

use crate::{
    error::InspectorError,
    gfx::resources::material::{MaterialId, MaterialManager},
};

use super::field::{BindingContext, FieldBinding, FieldValue};

/// Handle to a folder inside an [`InspectorPanel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FolderId(pub usize);

/// A named group of fields bound to one material
#[derive(Debug)]
pub struct Folder {
    name: String,
    material: MaterialId,
    context: BindingContext,
    fields: Vec<FieldBinding>,
}

impl Folder {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    pub fn context(&self) -> &BindingContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut BindingContext {
        &mut self.context
    }

    pub fn fields(&self) -> &[FieldBinding] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldBinding> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|field| field.name).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Registers a binding; fields render in registration order
    pub fn add(&mut self, binding: FieldBinding) -> &mut Self {
        self.fields.push(binding);
        self
    }
}

/// A single widget change, addressed by folder and field name
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEdit {
    pub folder: FolderId,
    pub field: String,
    pub value: FieldValue,
}

impl FieldEdit {
    pub fn new(folder: FolderId, field: &str, value: FieldValue) -> Self {
        Self {
            folder,
            field: field.to_string(),
            value,
        }
    }
}

/// Root of the debug panel
#[derive(Debug, Default)]
pub struct InspectorPanel {
    folders: Vec<Folder>,
}

impl InspectorPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty folder bound to `material`
    ///
    /// Folder names are unique within a panel; a clash gets a numeric suffix.
    pub fn add_folder(&mut self, name: &str, material: MaterialId) -> FolderId {
        let name = self.ensure_unique_name(name);
        self.folders.push(Folder {
            name,
            material,
            context: BindingContext::new(),
            fields: Vec::new(),
        });
        FolderId(self.folders.len() - 1)
    }

    pub fn folder(&self, id: FolderId) -> Option<&Folder> {
        self.folders.get(id.0)
    }

    pub fn folder_mut(&mut self, id: FolderId) -> Option<&mut Folder> {
        self.folders.get_mut(id.0)
    }

    pub fn folder_by_name(&self, name: &str) -> Option<FolderId> {
        self.folders
            .iter()
            .position(|folder| folder.name == name)
            .map(FolderId)
    }

    pub fn folders(&self) -> impl Iterator<Item = (FolderId, &Folder)> {
        self.folders
            .iter()
            .enumerate()
            .map(|(index, folder)| (FolderId(index), folder))
    }

    pub fn folder_count(&self) -> usize {
        self.folders.len()
    }

    /// Current value of a field as its widget should display it
    pub fn read(
        &self,
        folder: FolderId,
        field: &str,
        materials: &MaterialManager,
    ) -> Result<FieldValue, InspectorError> {
        let target = self
            .folder(folder)
            .ok_or(InspectorError::UnknownFolder(folder.0))?;
        let material = materials
            .get_material(target.material)
            .ok_or(InspectorError::UnknownMaterial(target.material.0))?;
        let binding = target
            .field(field)
            .ok_or_else(|| InspectorError::UnknownField {
                folder: target.name.clone(),
                field: field.to_string(),
            })?;
        Ok(binding.read(material, &target.context))
    }

    /// Applies an edit to the folder's material
    ///
    /// Rejected edits leave both the material and the folder context as they
    /// were.
    pub fn apply(
        &mut self,
        edit: FieldEdit,
        materials: &mut MaterialManager,
    ) -> Result<(), InspectorError> {
        let target = self
            .folders
            .get_mut(edit.folder.0)
            .ok_or(InspectorError::UnknownFolder(edit.folder.0))?;
        let material = materials
            .get_material_mut(target.material)
            .ok_or(InspectorError::UnknownMaterial(target.material.0))?;
        let binding = target
            .fields
            .iter()
            .find(|field| field.name == edit.field)
            .ok_or_else(|| InspectorError::UnknownField {
                folder: target.name.clone(),
                field: edit.field.clone(),
            })?;

        log::debug!(
            "{}.{} <- {:?} (material {})",
            target.name,
            edit.field,
            edit.value,
            target.material
        );
        binding.write(material, edit.value, &mut target.context)
    }

    fn ensure_unique_name(&self, desired_name: &str) -> String {
        let mut counter = 0;
        let mut test_name = desired_name.to_string();

        while self.folders.iter().any(|folder| folder.name == test_name) {
            counter += 1;
            test_name = format!("{} ({})", desired_name, counter);
        }

        test_name
    }
}
