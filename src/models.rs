use serde::Deserialize;

const REQUIRED: &str = "This field is required.";

/// A movie as fetched from TMDB, before it has an id or a rating.
#[derive(Clone, Debug, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub description: String,
    pub img_url: String,
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: i32,
}

#[derive(Debug, Deserialize)]
pub struct FindQuery {
    pub id: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct AddForm {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    pub title: String,
}

impl AddForm {
    pub fn validate(&self, csrf_ok: bool) -> Result<&str, FormErrors> {
        let mut errors = FormErrors::from_csrf(csrf_ok);
        let title = self.title.trim();
        if title.is_empty() {
            errors.push("title", REQUIRED);
        }
        errors.into_result(title)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct EditForm {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub review: String,
}

impl EditForm {
    /// Returns the parsed rating and the review exactly as submitted. The rating range is not checked.
    pub fn validate(&self, csrf_ok: bool) -> Result<(f64, &str), FormErrors> {
        let mut errors = FormErrors::from_csrf(csrf_ok);

        let rating = self.rating.trim();
        let parsed = if rating.is_empty() {
            errors.push("rating", REQUIRED);
            None
        } else {
            match rating.parse::<f64>() {
                // adding 0.0 folds -0.0 into 0.0
                Ok(value) if value.is_finite() => Some(value + 0.0),
                _ => {
                    errors.push("rating", "Rating must be a number, e.g. 7.5.");
                    None
                },
            }
        };

        let review = self.review.as_str();
        if review.trim().is_empty() {
            errors.push("review", REQUIRED);
        }

        match parsed {
            Some(rating) => errors.into_result((rating, review)),
            None => Err(errors),
        }
    }
}

#[derive(Debug, Default)]
pub struct FormErrors {
    pub form: Option<String>,
    fields: Vec<(&'static str, String)>,
}

impl FormErrors {
    fn from_csrf(csrf_ok: bool) -> Self {
        let form = (!csrf_ok).then(|| "The form expired. Please submit it again.".to_string());
        Self { form, fields: Vec::new() }
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.push((field, message.into()));
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|(field, _)| *field == name).map(|(_, msg)| msg.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.form.is_none() && self.fields.is_empty()
    }

    fn into_result<T>(self, value: T) -> Result<T, FormErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}
