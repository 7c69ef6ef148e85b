use thiserror::Error;

use crate::{NewTask, DESCRIPTION_MAX_CHARS, TITLE_MAX_CHARS};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskValidationError {
    #[error("Send all required fields: title, description")]
    MissingTitle,
    #[error("Send all required fields: title, description")]
    MissingDescription,
    #[error("title must be at most {max} characters (got {len})", max = TITLE_MAX_CHARS)]
    TitleTooLong { len: usize },
    #[error("description must be at most {max} characters (got {len})", max = DESCRIPTION_MAX_CHARS)]
    DescriptionTooLong { len: usize },
}

/// Checks a record against the stored-field constraints.
///
/// Lengths are counted in characters, not bytes.
pub fn validate_new_task(title: &str, description: &str) -> Result<NewTask, TaskValidationError> {
    let title_len = title.chars().count();
    if title_len == 0 {
        return Err(TaskValidationError::MissingTitle);
    }
    if title_len > TITLE_MAX_CHARS {
        return Err(TaskValidationError::TitleTooLong { len: title_len });
    }

    let description_len = description.chars().count();
    if description_len == 0 {
        return Err(TaskValidationError::MissingDescription);
    }
    if description_len > DESCRIPTION_MAX_CHARS {
        return Err(TaskValidationError::DescriptionTooLong {
            len: description_len,
        });
    }

    Ok(NewTask {
        title: title.to_owned(),
        description: description.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("x".to_owned(), "y".to_owned())]
    #[case("t".repeat(TITLE_MAX_CHARS), "y".to_owned())]
    #[case("x".to_owned(), "d".repeat(DESCRIPTION_MAX_CHARS))]
    #[case("é".repeat(TITLE_MAX_CHARS), "multi-byte title at the limit".to_owned())]
    fn accepts_values_within_bounds(#[case] title: String, #[case] description: String) {
        let task = validate_new_task(&title, &description).unwrap();
        assert_eq!(task.title(), title);
        assert_eq!(task.description(), description);
    }

    #[rstest]
    #[case(String::new(), "y".to_owned(), TaskValidationError::MissingTitle)]
    #[case("x".to_owned(), String::new(), TaskValidationError::MissingDescription)]
    #[case(
        "t".repeat(TITLE_MAX_CHARS + 1),
        "y".to_owned(),
        TaskValidationError::TitleTooLong { len: TITLE_MAX_CHARS + 1 }
    )]
    #[case(
        "x".to_owned(),
        "d".repeat(DESCRIPTION_MAX_CHARS + 1),
        TaskValidationError::DescriptionTooLong { len: DESCRIPTION_MAX_CHARS + 1 }
    )]
    fn rejects_values_out_of_bounds(
        #[case] title: String,
        #[case] description: String,
        #[case] expected: TaskValidationError,
    ) {
        assert_eq!(validate_new_task(&title, &description), Err(expected));
    }

    #[test]
    fn length_error_names_the_limit() {
        let err = validate_new_task(&"t".repeat(101), "y").unwrap_err();
        assert_eq!(err.to_string(), "title must be at most 100 characters (got 101)");
    }
}
