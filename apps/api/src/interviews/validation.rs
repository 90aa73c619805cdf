use crate::errors::AppError;
use crate::interviews::models::InterviewRequest;

pub const POSITION_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MIN_CHARS: usize = 10;

/// Returns every constraint `request` violates, in field order.
pub fn request_violations(request: &InterviewRequest) -> Vec<&'static str> {
    let mut violations = Vec::new();

    let position = request.position.trim();
    if position.is_empty() {
        violations.push("Position is required");
    } else if position.chars().count() > POSITION_MAX_CHARS {
        violations.push("Position must be 100 characters or less");
    }

    if request.description.trim().chars().count() < DESCRIPTION_MIN_CHARS {
        violations.push("min 10 characters description is required");
    }

    if !request.experience.is_finite() || request.experience < 0.0 {
        violations.push("Experience cannot be empty or negative");
    }

    if request.tech_stack.trim().is_empty() {
        violations.push("Tech stack must be atleast a character");
    }

    violations
}

/// Fails with a single `Validation` error listing all violations.
pub fn validate_request(request: &InterviewRequest) -> Result<(), AppError> {
    let violations = request_violations(request);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(violations.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> InterviewRequest {
        InterviewRequest {
            position: "Backend Engineer".to_string(),
            description: "Build APIs for a payments system".to_string(),
            experience: 3.0,
            tech_stack: "Go, PostgreSQL, gRPC".to_string(),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(validate_request(&valid()).is_ok());
    }

    #[test]
    fn test_zero_experience_is_allowed() {
        let mut req = valid();
        req.experience = 0.0;
        assert!(request_violations(&req).is_empty());
    }

    #[test]
    fn test_negative_experience_fails() {
        let mut req = valid();
        req.experience = -1.0;
        assert_eq!(
            request_violations(&req),
            vec!["Experience cannot be empty or negative"]
        );
    }

    #[test]
    fn test_nan_experience_fails() {
        let mut req = valid();
        req.experience = f64::NAN;
        assert_eq!(request_violations(&req).len(), 1);
    }

    #[test]
    fn test_blank_position_fails() {
        let mut req = valid();
        req.position = "   ".to_string();
        assert_eq!(request_violations(&req), vec!["Position is required"]);
    }

    #[test]
    fn test_position_length_boundary() {
        let mut req = valid();
        req.position = "a".repeat(100);
        assert!(request_violations(&req).is_empty());
        req.position = "a".repeat(101);
        assert_eq!(
            request_violations(&req),
            vec!["Position must be 100 characters or less"]
        );
    }

    #[test]
    fn test_position_length_counts_chars_not_bytes() {
        let mut req = valid();
        req.position = "é".repeat(100);
        assert!(request_violations(&req).is_empty());
    }

    #[test]
    fn test_description_boundary() {
        let mut req = valid();
        req.description = "123456789".to_string();
        assert_eq!(
            request_violations(&req),
            vec!["min 10 characters description is required"]
        );
        req.description = "1234567890".to_string();
        assert!(request_violations(&req).is_empty());
    }

    #[test]
    fn test_empty_tech_stack_fails() {
        let mut req = valid();
        req.tech_stack = String::new();
        assert_eq!(
            request_violations(&req),
            vec!["Tech stack must be atleast a character"]
        );
    }

    #[test]
    fn test_all_violations_reported_together() {
        let req = InterviewRequest {
            position: String::new(),
            description: "short".to_string(),
            experience: -2.0,
            tech_stack: " ".to_string(),
        };
        match validate_request(&req) {
            Err(AppError::Validation(msg)) => {
                assert_eq!(msg.split("; ").count(), 4);
                assert!(msg.starts_with("Position is required"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
