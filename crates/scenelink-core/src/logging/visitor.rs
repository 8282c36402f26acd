use tracing::field::{Field, Visit};

/// Collects the `message` field and the remaining key/value pairs of an event.
#[derive(Debug, Default)]
pub struct FieldVisitor {
    /// The formatted `message` field.
    pub message: String,
    /// Every other field, in record order.
    pub fields: Vec<(String, String)>,
}

impl FieldVisitor {
    /// Message followed by ` key=value` pairs.
    pub fn render(&self) -> String {
        let mut out = self.message.clone();
        for (key, value) in &self.fields {
            out.push(' ');
            out.push_str(key);
            out.push('=');
            out.push_str(value);
        }
        out
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let val = format!("{value:?}");
        if field.name() == "message" {
            self.message = val;
        } else {
            self.fields.push((field.name().to_owned(), val));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            value.clone_into(&mut self.message);
        } else {
            self.fields.push((field.name().to_owned(), value.to_owned()));
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.push((field.name().to_owned(), value.to_string()));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.push((field.name().to_owned(), value.to_string()));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.push((field.name().to_owned(), value.to_string()));
    }
}
