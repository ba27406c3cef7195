use lumen_api::modules::enrollments::model::{
    EnrollmentDetailsDto, EnrollmentItemDto, GuardianDetailsDto, StudentDetailsDto,
};
use lumen_api::modules::enrollments::validation::{
    is_valid_academic_year, is_valid_email, is_valid_phone, is_valid_relation,
    validate_enrollment_item,
};

fn valid_item() -> EnrollmentItemDto {
    EnrollmentItemDto {
        student: StudentDetailsDto {
            first_name: "Ama".to_string(),
            last_name: "Boateng".to_string(),
            email: None,
            phone: None,
            date_of_birth: None,
            gender: Some("Female".to_string()),
        },
        guardian: GuardianDetailsDto {
            first_name: "Kofi".to_string(),
            last_name: "Boateng".to_string(),
            email: "kofi.boateng@example.com".to_string(),
            phone: Some("+233 24 123 4567".to_string()),
            relation: "Father".to_string(),
            age: Some(40),
        },
        enrollment: EnrollmentDetailsDto {
            grade_level: "5".to_string(),
            academic_year: "2024-2025".to_string(),
        },
    }
}

#[test]
fn test_valid_item_produces_no_errors() {
    assert!(validate_enrollment_item(&valid_item()).is_empty());
}

#[test]
fn test_missing_required_fields_are_all_reported() {
    let mut item = valid_item();
    item.student.first_name = "".to_string();
    item.guardian.email = "  ".to_string();
    item.enrollment.grade_level = "".to_string();

    let errors = validate_enrollment_item(&item);

    assert_eq!(errors.len(), 3);
    assert!(errors.iter().any(|e| e.contains("student.first_name")));
    assert!(errors.iter().any(|e| e.contains("guardian.email")));
    assert!(errors.iter().any(|e| e.contains("enrollment.grade_level")));
}

#[test]
fn test_bad_guardian_email_is_rejected() {
    let mut item = valid_item();
    item.guardian.email = "not-an-email".to_string();

    let errors = validate_enrollment_item(&item);

    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("guardian.email"));
}

#[test]
fn test_unknown_relation_is_rejected() {
    let mut item = valid_item();
    item.guardian.relation = "Neighbour".to_string();

    let errors = validate_enrollment_item(&item);

    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("guardian.relation"));
}

#[test]
fn test_relation_is_case_insensitive() {
    assert!(is_valid_relation("father"));
    assert!(is_valid_relation("GRANDPARENT"));
    assert!(is_valid_relation(" Mother "));
    assert!(!is_valid_relation("cousin"));
}

#[test]
fn test_academic_year_shape() {
    assert!(is_valid_academic_year("2024-2025"));
    assert!(is_valid_academic_year(" 2024-2025 "));
    assert!(!is_valid_academic_year("2024/2025"));
    assert!(!is_valid_academic_year("24-25"));
    assert!(!is_valid_academic_year("2024-25"));
    assert!(!is_valid_academic_year(""));
}

#[test]
fn test_phone_shapes() {
    assert!(is_valid_phone("+233241234567"));
    assert!(is_valid_phone("(024) 123-4567"));
    assert!(is_valid_phone("024 123 4567"));
    assert!(!is_valid_phone("12345"));
    assert!(!is_valid_phone("phone-number"));
    assert!(!is_valid_phone("024+1234567"));
}

#[test]
fn test_guardian_age_bounds() {
    let mut item = valid_item();

    item.guardian.age = Some(0);
    assert_eq!(validate_enrollment_item(&item).len(), 1);

    item.guardian.age = Some(150);
    assert_eq!(validate_enrollment_item(&item).len(), 1);

    item.guardian.age = Some(149);
    assert!(validate_enrollment_item(&item).is_empty());

    item.guardian.age = None;
    assert!(validate_enrollment_item(&item).is_empty());
}

#[test]
fn test_optional_student_contact_is_validated_when_present() {
    let mut item = valid_item();
    item.student.email = Some("bad@".to_string());
    item.student.phone = Some("abc".to_string());

    let errors = validate_enrollment_item(&item);

    assert_eq!(errors.len(), 2);
    assert!(is_valid_email("good@example.com"));
}
