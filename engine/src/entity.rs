//! The record types managed by the admin screens.

use crate::schema::{EntitySchema, Extractor, FieldDef, FieldType, SearchField, SortField};
use crate::Error;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// An entity type with its own listing screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Administrators,
    Teachers,
    Students,
    Subjects,
}

const ID: Extractor = Extractor::Field(&["id"]);
const EMAIL: Extractor = Extractor::Field(&["user", "email"]);
const RFC: Extractor = Extractor::Field(&["rfc"]);

impl EntityKind {
    /// All entity kinds, in menu order.
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Administrators,
        EntityKind::Teachers,
        EntityKind::Students,
        EntityKind::Subjects,
    ];

    /// URL slug used by the service routes.
    pub fn slug(&self) -> &'static str {
        match self {
            EntityKind::Administrators => "administrators",
            EntityKind::Teachers => "teachers",
            EntityKind::Students => "students",
            EntityKind::Subjects => "subjects",
        }
    }

    /// Upstream endpoint returning the full collection.
    pub fn list_path(&self) -> &'static str {
        match self {
            EntityKind::Administrators => "lista-admins/",
            EntityKind::Teachers => "lista-maestros/",
            EntityKind::Students => "lista-alumnos/",
            EntityKind::Subjects => "lista-materias/",
        }
    }

    /// Upstream endpoint for single-record create/update/delete.
    pub fn item_path(&self) -> &'static str {
        match self {
            EntityKind::Administrators => "admin/",
            EntityKind::Teachers => "maestros/",
            EntityKind::Students => "alumnos/",
            EntityKind::Subjects => "materias/",
        }
    }

    /// Whether records of this kind are user accounts.
    pub fn is_user(&self) -> bool {
        !matches!(self, EntityKind::Subjects)
    }

    /// Build the descriptor table for this entity.
    pub fn schema(&self) -> EntitySchema {
        let (searchable, sortable, fields) = match self {
            EntityKind::Administrators => (
                vec![
                    SearchField::new("id", ID),
                    SearchField::new("nombre", Extractor::FullName),
                    SearchField::new("email", EMAIL),
                    SearchField::new("rfc", RFC),
                ],
                vec![
                    SortField::numeric("id", ID),
                    SortField::text("nombre", Extractor::FullName),
                ],
                user_fields(&[
                    FieldDef::required("clave_admin", FieldType::String),
                    FieldDef::required("rfc", FieldType::String),
                    FieldDef::optional("telefono", FieldType::String),
                    FieldDef::optional("ocupacion", FieldType::String),
                ]),
            ),
            EntityKind::Teachers => (
                vec![
                    SearchField::new("id", ID),
                    SearchField::new("nombre", Extractor::FullName),
                    SearchField::new("email", EMAIL),
                    SearchField::new("id_trabajador", Extractor::Field(&["id_trabajador"])),
                    SearchField::new("rfc", RFC),
                ],
                vec![
                    SortField::numeric("id", ID),
                    SortField::text("nombre", Extractor::FullName),
                    SortField::text("id_trabajador", Extractor::Field(&["id_trabajador"])),
                ],
                user_fields(&[
                    FieldDef::required("id_trabajador", FieldType::String),
                    FieldDef::required("rfc", FieldType::String),
                    FieldDef::optional("cubiculo", FieldType::String),
                    FieldDef::optional("area_investigacion", FieldType::String),
                    FieldDef::optional("materias_json", FieldType::StringList),
                ]),
            ),
            EntityKind::Students => (
                vec![
                    SearchField::new("id", ID),
                    SearchField::new("nombre", Extractor::FullName),
                    SearchField::new("email", EMAIL),
                    SearchField::new("matricula", Extractor::Field(&["matricula"])),
                    SearchField::new("curp", Extractor::Field(&["curp"])),
                ],
                vec![
                    SortField::numeric("id", ID),
                    SortField::text("nombre", Extractor::FullName),
                    SortField::text("matricula", Extractor::Field(&["matricula"])),
                ],
                user_fields(&[
                    FieldDef::required("matricula", FieldType::String),
                    FieldDef::required("curp", FieldType::String),
                    FieldDef::optional("rfc", FieldType::String),
                    FieldDef::optional("edad", FieldType::Int),
                    FieldDef::optional("ocupacion", FieldType::String),
                ]),
            ),
            EntityKind::Subjects => (
                vec![
                    SearchField::new("nrc", Extractor::Field(&["nrc"])),
                    SearchField::new("nombre", Extractor::Field(&["nombre"])),
                    SearchField::new("seccion", Extractor::Field(&["seccion"])),
                    SearchField::new(
                        "programa_educativo",
                        Extractor::Field(&["programa_educativo"]),
                    ),
                    SearchField::new("profesor_nombre", Extractor::Field(&["profesor_nombre"])),
                ],
                vec![
                    SortField::numeric("nrc", Extractor::Field(&["nrc"])),
                    SortField::text("nombre", Extractor::Field(&["nombre"])),
                    SortField::text("seccion", Extractor::Field(&["seccion"])),
                    SortField::text(
                        "programa_educativo",
                        Extractor::Field(&["programa_educativo"]),
                    ),
                    SortField::text("profesor_nombre", Extractor::Field(&["profesor_nombre"])),
                ],
                vec![
                    FieldDef::required("nrc", FieldType::String),
                    FieldDef::required("nombre", FieldType::String),
                    FieldDef::required("seccion", FieldType::String),
                    FieldDef::required("dias", FieldType::StringList),
                    FieldDef::required("hora_inicio", FieldType::String),
                    FieldDef::required("hora_fin", FieldType::String),
                    FieldDef::required("salon", FieldType::String),
                    FieldDef::required("programa_educativo", FieldType::String),
                    FieldDef::required("profesor_id", FieldType::String),
                    FieldDef::required("creditos", FieldType::Int),
                ],
            ),
        };

        EntitySchema {
            entity: *self,
            searchable,
            sortable,
            fields,
        }
    }
}

/// Fields shared by every user account form, followed by role-specific ones.
fn user_fields(extra: &[FieldDef]) -> Vec<FieldDef> {
    let mut fields = vec![
        FieldDef::required("first_name", FieldType::String),
        FieldDef::required("last_name", FieldType::String),
        FieldDef::required("email", FieldType::String),
    ];
    fields.extend_from_slice(extra);
    fields
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for EntityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == s)
            .ok_or_else(|| Error::UnknownEntity(s.to_string()))
    }
}
