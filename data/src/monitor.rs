use crate::internal::*;

/// Quantity watched by training callbacks such as early stopping.
///
/// Either the total loss, or a named metric of one output, computed on the
/// training or on the validation data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct MonitoredQuantity {
    validation: bool,
    quantity: Option<String>,
    output: Option<String>,
}

impl MonitoredQuantity {
    pub fn total_loss(validation: bool) -> MonitoredQuantity {
        MonitoredQuantity { validation, quantity: None, output: None }
    }

    pub fn metric(
        validation: bool,
        quantity: impl Into<String>,
        output: impl Into<String>,
    ) -> MonitoredQuantity {
        MonitoredQuantity {
            validation,
            quantity: Some(quantity.into()),
            output: Some(output.into()),
        }
    }

    pub fn is_validation(&self) -> bool {
        self.validation
    }

    pub fn quantity(&self) -> Option<&str> {
        self.quantity.as_deref()
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    /// Name the backend reports this quantity under: `loss`, `val_loss`,
    /// `dense_1_accuracy`, `val_dense_1_accuracy`...
    pub fn backend_identifier(&self) -> String {
        let base = self.quantity.as_deref().map(|q| q.to_lowercase());
        let base = base.as_deref().unwrap_or("loss");
        let name = match &self.output {
            Some(output) => format!("{output}_{base}"),
            None => base.to_string(),
        };
        if self.validation { format!("val_{name}") } else { name }
    }
}

impl fmt::Display for MonitoredQuantity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} ({})",
            if self.validation { "Validation" } else { "Training" },
            self.quantity.as_deref().map(|q| q.to_lowercase()).as_deref().unwrap_or("loss"),
            self.output.as_deref().unwrap_or("total")
        )
    }
}

impl Persist for MonitoredQuantity {
    fn save_to(&self, settings: &mut Settings) {
        settings.set("validation", self.validation);
        if let Some(q) = &self.quantity {
            settings.set("quantity", q.as_str());
        }
        if let Some(o) = &self.output {
            settings.set("output", o.as_str());
        }
    }

    fn load_from(settings: &Settings) -> DlResult<MonitoredQuantity> {
        let optional = |key: &str| -> DlResult<Option<String>> {
            if settings.contains(key) {
                Ok(Some(settings.get_string(key)?.to_string()))
            } else {
                Ok(None)
            }
        };
        Ok(MonitoredQuantity {
            validation: settings.get_bool("validation")?,
            quantity: optional("quantity")?,
            output: optional("output")?,
        })
    }
}
