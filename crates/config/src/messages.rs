//! Message catalogue
//!
//! Every user-facing text the engine emits. Defaults are the es_419 texts;
//! any entry can be overridden under `dialog.messages` in the settings files.
//!
//! Templates use `{placeholder}` markers filled by [`render`].

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::constants::choices;
use crate::normalize::fold;
use crate::ConfigError;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([a-z_]+)\}").expect("valid placeholder pattern"));

/// Base prompts, one per data slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotPrompts {
    pub contact_name: String,
    pub phone_number: String,
    pub child_name: String,
    pub child_age: String,
    pub school_level: String,
    pub days_per_week: String,
    pub hours_per_day: String,
    pub shift: String,
}

impl Default for SlotPrompts {
    fn default() -> Self {
        Self {
            contact_name: "¿Cuál es tu nombre?".to_string(),
            phone_number: "¿Cuál es tu número de celular?".to_string(),
            child_name: "¿Cuál es el nombre de tu hijo?".to_string(),
            child_age: "¿Cuántos años tiene tu hijo?".to_string(),
            school_level: "¿En qué nivel de escolaridad está tu hijo?".to_string(),
            days_per_week: "¿Cuántos días a la semana deseas el servicio? (1 a 5)".to_string(),
            hours_per_day: "¿Cuántas horas por día requieres el servicio? (1 a 4)".to_string(),
            shift: "¿Requieres jornada en la mañana o en la tarde?".to_string(),
        }
    }
}

/// Rejection messages for rule-bound slots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RejectionMessages {
    pub phone_number: String,
    pub child_age: String,
    pub days_per_week: String,
    pub hours_per_day: String,
}

impl Default for RejectionMessages {
    fn default() -> Self {
        Self {
            phone_number: "El número ingresado no es válido en Colombia. Debe tener 10 dígitos. \
                           Por favor, ingrésalo nuevamente."
                .to_string(),
            child_age: "Este servicio es para educación de edades tempranas (2 a 12 años). \
                        No trabajamos con bebés ni adolescentes. \
                        ¿Cuántos años tiene tu hijo?"
                .to_string(),
            days_per_week: "Máximo se disponibilizan 5 días a la semana en horarios hábiles. \
                            ¿Cuántos días a la semana deseas el servicio? (1 a 5)"
                .to_string(),
            hours_per_day: "Por reglas de la empresa no se programa a un niño con más de 4 horas \
                            diarias. ¿Cuántas horas por día requieres? (1 a 4)"
                .to_string(),
        }
    }
}

/// Confirmation summary and card texts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfirmationMessages {
    /// Summary header, `{contact_name}` available
    pub header: String,
    /// Summary footer
    pub footer: String,
    pub card_title: String,
    pub card_subtitle: String,
    pub yes_label: String,
    pub yes_value: String,
    pub no_label: String,
    pub no_value: String,
    /// Reply to a negative answer, `{restart_command}` available
    pub denied: String,
}

impl Default for ConfirmationMessages {
    fn default() -> Self {
        Self {
            header: "{contact_name}, ¿son correctos estos datos?".to_string(),
            footer: " -> Confirma para continuar.".to_string(),
            card_title: "¿Deseas confirmar?".to_string(),
            card_subtitle: "Selecciona una opción:".to_string(),
            yes_label: "Sí".to_string(),
            yes_value: "sí".to_string(),
            no_label: "No".to_string(),
            no_value: "no".to_string(),
            denied: "Entendido. Dime qué dato deseas corregir o escribe '{restart_command}' \
                     para empezar de nuevo."
                .to_string(),
        }
    }
}

/// Closing and system texts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClosingMessages {
    /// Success text, `{contact_name}` and `{reference_id}` available
    pub fulfilled: String,
    pub another_request_title: String,
    pub another_request_label: String,
    pub not_confirmed: String,
    /// Shown when the store write fails; the user can confirm again
    pub persistence_failed: String,
    pub restart: String,
    pub unknown_intent: String,
    pub fallback: String,
    /// Title of the card carrying choice buttons during elicitation
    pub options_title: String,
}

impl Default for ClosingMessages {
    fn default() -> Self {
        Self {
            fulfilled: "Gracias {contact_name}. Tu registro ha sido creado. El ID es \
                        {reference_id}. Te contactaremos a la brevedad para coordinar \
                        detalles. Que tengas un feliz dia!!!"
                .to_string(),
            another_request_title: "¿Deseas realizar otra solicitud?".to_string(),
            another_request_label: "Registrar otra".to_string(),
            not_confirmed: "No se confirmó el registro. Podemos intentarlo de nuevo cuando \
                            quieras."
                .to_string(),
            persistence_failed: "Lo sentimos, no pudimos guardar tu solicitud en este momento. \
                                 Responde Sí para intentarlo de nuevo."
                .to_string(),
            restart: "¡Vamos de nuevo! Para registrar otra solicitud, empecemos. \
                      ¿Cuál es tu nombre?"
                .to_string(),
            unknown_intent: "Puedo ayudarte a registrar una solicitud de docente.".to_string(),
            fallback: "¿En qué puedo ayudarte?".to_string(),
            options_title: "Opciones".to_string(),
        }
    }
}

/// Complete message catalogue
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagesConfig {
    pub prompts: SlotPrompts,
    pub rejections: RejectionMessages,
    pub confirmation: ConfirmationMessages,
    pub closing: ClosingMessages,
}

impl MessagesConfig {
    /// Reject empty templates, clashing yes/no values and a success message
    /// without the reference id
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("prompts.contact_name", &self.prompts.contact_name),
            ("prompts.phone_number", &self.prompts.phone_number),
            ("prompts.child_name", &self.prompts.child_name),
            ("prompts.child_age", &self.prompts.child_age),
            ("prompts.school_level", &self.prompts.school_level),
            ("prompts.days_per_week", &self.prompts.days_per_week),
            ("prompts.hours_per_day", &self.prompts.hours_per_day),
            ("prompts.shift", &self.prompts.shift),
            ("rejections.phone_number", &self.rejections.phone_number),
            ("rejections.child_age", &self.rejections.child_age),
            ("rejections.days_per_week", &self.rejections.days_per_week),
            ("rejections.hours_per_day", &self.rejections.hours_per_day),
            ("confirmation.yes_value", &self.confirmation.yes_value),
            ("confirmation.no_value", &self.confirmation.no_value),
            ("closing.fulfilled", &self.closing.fulfilled),
            ("closing.restart", &self.closing.restart),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("dialog.messages.{}", field),
                    message: "Must not be empty".to_string(),
                });
            }
        }

        self.validate_confirmation_values()?;

        if !self.closing.fulfilled.contains("{reference_id}") {
            return Err(ConfigError::InvalidValue {
                field: "dialog.messages.closing.fulfilled".to_string(),
                message: "Must contain the {reference_id} placeholder".to_string(),
            });
        }

        Ok(())
    }

    /// The yes button must not read as a no, and the other way round
    fn validate_confirmation_values(&self) -> Result<(), ConfigError> {
        let yes = fold(&self.confirmation.yes_value);
        let no = fold(&self.confirmation.no_value);

        if yes == no {
            return Err(ConfigError::InvalidValue {
                field: "dialog.messages.confirmation.no_value".to_string(),
                message: "Must differ from confirmation.yes_value".to_string(),
            });
        }
        if choices::NEGATIVE.contains(&yes.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "dialog.messages.confirmation.yes_value".to_string(),
                message: format!("'{}' is a negative answer", yes),
            });
        }
        if choices::AFFIRMATIVE.contains(&no.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "dialog.messages.confirmation.no_value".to_string(),
                message: format!("'{}' is an affirmative answer", no),
            });
        }

        Ok(())
    }
}

/// Fill `{key}` placeholders in a template.
///
/// Single pass over the template: substituted values are never scanned
/// again, so a value that itself looks like a placeholder is kept verbatim.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let key = &caps[1];
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
