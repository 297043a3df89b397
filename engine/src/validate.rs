//! Form validation for create and update payloads.
//!
//! Validation collects every problem at once so a form can highlight all
//! offending inputs, instead of stopping at the first error.

use crate::error::Result;
use crate::schema::FieldDef;
use crate::{EntityKind, Error};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const REQUIRED: &str = "this field is required";

/// Per-field error messages, ordered by field name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error, replacing any earlier message for the field.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Ok(())` when empty, otherwise [`Error::Validation`].
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self))
        }
    }
}

/// Validate a payload for `entity`. `editing` relaxes password rules.
pub fn validate_record(entity: EntityKind, payload: &Value, editing: bool) -> Result<()> {
    let obj = payload
        .as_object()
        .ok_or_else(|| Error::InvalidPayload("payload must be an object".into()))?;

    let errors = if entity.is_user() {
        validate_user(entity, obj, editing)
    } else {
        validate_subject(obj)
    };
    errors.into_result()
}

/// Subject (course section) rules.
pub fn validate_subject(data: &Map<String, Value>) -> FieldErrors {
    let mut errors = FieldErrors::new();

    let nrc = text(data, "nrc");
    if nrc.is_empty() {
        errors.insert("nrc", REQUIRED);
    } else if !is_digits(&nrc) {
        errors.insert("nrc", "NRC must contain digits only");
    } else if nrc.chars().count() != 5 {
        errors.insert("nrc", "NRC must have exactly 5 digits");
    }

    let nombre = text(data, "nombre");
    if nombre.is_empty() {
        errors.insert("nombre", REQUIRED);
    } else if !nombre.chars().all(|c| is_name_letter(c) || c.is_whitespace()) {
        errors.insert("nombre", "name may only contain letters and spaces");
    }

    let seccion = text(data, "seccion");
    if seccion.is_empty() {
        errors.insert("seccion", REQUIRED);
    } else if !is_digits(&seccion) {
        errors.insert("seccion", "section must contain digits only");
    } else if seccion.chars().count() > 3 {
        errors.insert("seccion", "section may have at most 3 digits");
    }

    let has_days = data
        .get("dias")
        .and_then(Value::as_array)
        .is_some_and(|days| !days.is_empty());
    if !has_days {
        errors.insert("dias", "select at least one day");
    }

    let start = text(data, "hora_inicio");
    let end = text(data, "hora_fin");
    if start.is_empty() {
        errors.insert("hora_inicio", REQUIRED);
    }
    if end.is_empty() {
        errors.insert("hora_fin", REQUIRED);
    }
    // Zero-padded HH:MM compares correctly as text.
    if !start.is_empty() && !end.is_empty() && start >= end {
        errors.insert("hora_fin", "end time must be after start time");
    }

    let salon = text(data, "salon");
    if salon.is_empty() {
        errors.insert("salon", REQUIRED);
    } else if !salon
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
    {
        errors.insert("salon", "room may only contain letters, digits and spaces");
    } else if salon.chars().count() > 15 {
        errors.insert("salon", "room may have at most 15 characters");
    }

    if text(data, "programa_educativo").is_empty() {
        errors.insert("programa_educativo", "select an educational program");
    }

    if text(data, "profesor_id").is_empty() {
        errors.insert("profesor_id", "select a teacher");
    }

    let creditos = text(data, "creditos");
    if creditos.is_empty() {
        errors.insert("creditos", REQUIRED);
    } else if !is_digits(&creditos) {
        errors.insert("creditos", "credits must be numeric");
    } else if creditos.parse::<u32>().map_or(true, |n| n == 0) {
        errors.insert("creditos", "credits must be greater than 0");
    } else if creditos.chars().count() > 2 {
        errors.insert("creditos", "credits may have at most 2 digits");
    }

    errors
}

/// User account rules for administrators, teachers and students.
pub fn validate_user(entity: EntityKind, data: &Map<String, Value>, editing: bool) -> FieldErrors {
    let mut errors = FieldErrors::new();

    for field in &entity.schema().fields {
        check_field(field, data, &mut errors);
    }

    let email = text(data, "email");
    if !email.is_empty() && !is_email(&email) {
        errors.insert("email", "enter a valid email address");
    }

    let password = text(data, "password");
    let confirm = text(data, "confirmar_password");
    if !editing && password.is_empty() {
        errors.insert("password", REQUIRED);
    }
    if !editing && confirm.is_empty() {
        errors.insert("confirmar_password", REQUIRED);
    }
    if !password.is_empty() && password != confirm {
        errors.insert("confirmar_password", "passwords do not match");
    }

    errors
}

fn check_field(field: &FieldDef, data: &Map<String, Value>, errors: &mut FieldErrors) {
    match field.validate(data.get(&field.name)) {
        Ok(()) => {}
        Err(Error::MissingRequiredField(name)) => errors.insert(name, REQUIRED),
        Err(err) => errors.insert(field.name.clone(), err.to_string()),
    }
}

/// Trimmed text of a scalar field; numbers are rendered.
fn text(data: &Map<String, Value>, field: &str) -> String {
    match data.get(field) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn is_name_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || "áéíóúÁÉÍÓÚñÑüÜ".contains(c)
}

fn is_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !s.contains(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}
