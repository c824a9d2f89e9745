// src/core/template.rs
//
// The two extraction templates (Hebrew and English) are structurally
// identical up to key naming. They are defined statically so field paths
// are checked at compile time instead of being rebuilt from JSON files at
// runtime.
use crate::Language;
use serde_json::{Map, Value};

/// One field of a form schema. Empty `children` marks a string leaf.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub children: &'static [FieldSpec],
}

const fn leaf(name: &'static str) -> FieldSpec {
    FieldSpec { name, children: &[] }
}

const fn node(name: &'static str, children: &'static [FieldSpec]) -> FieldSpec {
    FieldSpec { name, children }
}

const DATE_EN: &[FieldSpec] = &[leaf("day"), leaf("month"), leaf("year")];

const ADDRESS_EN: &[FieldSpec] = &[
    leaf("street"),
    leaf("houseNumber"),
    leaf("entrance"),
    leaf("apartment"),
    leaf("city"),
    leaf("postalCode"),
    leaf("poBox"),
];

const MEDICAL_EN: &[FieldSpec] = &[
    leaf("healthFundMember"),
    leaf("natureOfAccident"),
    leaf("medicalDiagnoses"),
];

pub const ENGLISH_FORM: &[FieldSpec] = &[
    leaf("lastName"),
    leaf("firstName"),
    leaf("idNumber"),
    leaf("gender"),
    node("dateOfBirth", DATE_EN),
    node("address", ADDRESS_EN),
    leaf("landlinePhone"),
    leaf("mobilePhone"),
    leaf("jobType"),
    node("dateOfInjury", DATE_EN),
    leaf("timeOfInjury"),
    leaf("accidentLocation"),
    leaf("accidentAddress"),
    leaf("accidentDescription"),
    leaf("injuredBodyPart"),
    leaf("signature"),
    node("formFillingDate", DATE_EN),
    node("formReceiptDateAtClinic", DATE_EN),
    node("medicalInstitutionFields", MEDICAL_EN),
];

const DATE_HE: &[FieldSpec] = &[leaf("יום"), leaf("חודש"), leaf("שנה")];

const ADDRESS_HE: &[FieldSpec] = &[
    leaf("רחוב"),
    leaf("מספר בית"),
    leaf("כניסה"),
    leaf("דירה"),
    leaf("ישוב"),
    leaf("מיקוד"),
    leaf("תא דואר"),
];

const MEDICAL_HE: &[FieldSpec] = &[
    leaf("חבר בקופת חולים"),
    leaf("מהות התאונה"),
    leaf("אבחנות רפואיות"),
];

pub const HEBREW_FORM: &[FieldSpec] = &[
    leaf("שם משפחה"),
    leaf("שם פרטי"),
    leaf("מספר זהות"),
    leaf("מין"),
    node("תאריך לידה", DATE_HE),
    node("כתובת", ADDRESS_HE),
    leaf("טלפון קווי"),
    leaf("טלפון נייד"),
    leaf("סוג העבודה"),
    node("תאריך הפגיעה", DATE_HE),
    leaf("שעת הפגיעה"),
    leaf("מקום התאונה"),
    leaf("כתובת מקום התאונה"),
    leaf("תיאור התאונה"),
    leaf("האיבר שנפגע"),
    leaf("חתימה"),
    node("תאריך מילוי הטופס", DATE_HE),
    node("תאריך קבלת הטופס בקופה", DATE_HE),
    node("למילוי ע\"י המוסד הרפואי", MEDICAL_HE),
];

/// Field schema for `language`.
pub fn schema(language: Language) -> &'static [FieldSpec] {
    match language {
        Language::Hebrew => HEBREW_FORM,
        Language::English => ENGLISH_FORM,
    }
}

/// The empty extraction template sent to the model: every leaf is `""`,
/// keys in schema order.
pub fn empty_template(language: Language) -> Value {
    Value::Object(build_object(schema(language)))
}

fn build_object(fields: &[FieldSpec]) -> Map<String, Value> {
    let mut map = Map::new();
    for field in fields {
        let value = if field.children.is_empty() {
            Value::String(String::new())
        } else {
            Value::Object(build_object(field.children))
        };
        map.insert(field.name.to_string(), value);
    }
    map
}

/// Dot-joined leaf paths of the schema, in schema order. This is the
/// canonical required-field list for `language`.
pub fn required_paths(language: Language) -> Vec<String> {
    let mut paths = Vec::new();
    collect_paths(schema(language), "", &mut paths);
    paths
}

fn collect_paths(fields: &[FieldSpec], parent: &str, out: &mut Vec<String>) {
    for field in fields {
        let full = if parent.is_empty() {
            field.name.to_string()
        } else {
            format!("{}.{}", parent, field.name)
        };
        if field.children.is_empty() {
            out.push(full);
        } else {
            collect_paths(field.children, &full, out);
        }
    }
}
