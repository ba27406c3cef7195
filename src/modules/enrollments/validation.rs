//! Field-level validation for enrollment items.
//!
//! Runs before orchestration so invalid input is rejected with a full list
//! of per-field messages instead of failing mid-provisioning. The
//! orchestrator trusts input that passes here.

use validator::ValidateEmail;

use crate::modules::enrollments::model::EnrollmentItemDto;

const VALID_RELATIONS: &[&str] = &[
    "Parent",
    "Mother",
    "Father",
    "Guardian",
    "Aunt",
    "Uncle",
    "Grandparent",
    "Sibling",
    "Other",
];

const VALID_GENDERS: &[&str] = &["Male", "Female", "Other"];

pub fn is_valid_email(email: &str) -> bool {
    email.trim().validate_email()
}

/// Optional; permissive shape check: digits with an optional leading `+`
/// and common separators.
pub fn is_valid_phone(phone: &str) -> bool {
    let trimmed = phone.trim();
    let digits = trimmed.chars().filter(|c| c.is_ascii_digit()).count();
    (7..=15).contains(&digits)
        && trimmed
            .chars()
            .enumerate()
            .all(|(i, c)| {
                c.is_ascii_digit()
                    || matches!(c, '-' | ' ' | '.' | '(' | ')')
                    || (c == '+' && i == 0)
            })
}

/// Format `NNNN-NNNN`, e.g. `2024-2025`.
pub fn is_valid_academic_year(year: &str) -> bool {
    let bytes = year.trim().as_bytes();
    bytes.len() == 9
        && bytes[4] == b'-'
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[5..].iter().all(u8::is_ascii_digit)
}

pub fn is_valid_relation(relation: &str) -> bool {
    VALID_RELATIONS
        .iter()
        .any(|valid| valid.eq_ignore_ascii_case(relation.trim()))
}

pub fn is_valid_gender(gender: &str) -> bool {
    VALID_GENDERS
        .iter()
        .any(|valid| valid.eq_ignore_ascii_case(gender.trim()))
}

pub fn is_valid_age(age: i32) -> bool {
    (1..150).contains(&age)
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Validate one enrollment item, returning every problem found. An empty
/// list means the item is safe to hand to the orchestrator.
pub fn validate_enrollment_item(item: &EnrollmentItemDto) -> Vec<String> {
    let mut errors = Vec::new();

    if is_blank(&item.student.first_name) {
        errors.push("student.first_name is required".to_string());
    }
    if is_blank(&item.student.last_name) {
        errors.push("student.last_name is required".to_string());
    }
    if let Some(email) = &item.student.email {
        if !is_blank(email) && !is_valid_email(email) {
            errors.push("student.email is not a valid email address".to_string());
        }
    }
    if let Some(phone) = &item.student.phone {
        if !is_blank(phone) && !is_valid_phone(phone) {
            errors.push("student.phone is not a valid phone number".to_string());
        }
    }
    if let Some(gender) = &item.student.gender {
        if !is_blank(gender) && !is_valid_gender(gender) {
            errors.push("student.gender must be one of Male, Female, Other".to_string());
        }
    }

    if is_blank(&item.guardian.first_name) {
        errors.push("guardian.first_name is required".to_string());
    }
    if is_blank(&item.guardian.last_name) {
        errors.push("guardian.last_name is required".to_string());
    }
    if is_blank(&item.guardian.email) {
        errors.push("guardian.email is required".to_string());
    } else if !is_valid_email(&item.guardian.email) {
        errors.push("guardian.email is not a valid email address".to_string());
    }
    if let Some(phone) = &item.guardian.phone {
        if !is_blank(phone) && !is_valid_phone(phone) {
            errors.push("guardian.phone is not a valid phone number".to_string());
        }
    }
    if is_blank(&item.guardian.relation) {
        errors.push("guardian.relation is required".to_string());
    } else if !is_valid_relation(&item.guardian.relation) {
        errors.push(format!(
            "guardian.relation must be one of {}",
            VALID_RELATIONS.join(", ")
        ));
    }
    if let Some(age) = item.guardian.age {
        if !is_valid_age(age) {
            errors.push("guardian.age must be between 1 and 149".to_string());
        }
    }

    if is_blank(&item.enrollment.grade_level) {
        errors.push("enrollment.grade_level is required".to_string());
    }
    if is_blank(&item.enrollment.academic_year) {
        errors.push("enrollment.academic_year is required".to_string());
    } else if !is_valid_academic_year(&item.enrollment.academic_year) {
        errors.push("enrollment.academic_year must match NNNN-NNNN, e.g. 2024-2025".to_string());
    }

    errors
}
