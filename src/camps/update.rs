//! Camp Update
//!
//! Partial update submitted from the camp self-service form. Every field is
//! optional; a present field is validated on its own and then merged.

use thiserror::Error;

use crate::camps::{Camp, CampField, UnknownCampField};

/// Errors produced while building or validating a camp update.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CampUpdateError {
    /// The update carries no fields
    #[error("update contains no fields")]
    Empty,

    /// Unknown field name
    #[error(transparent)]
    UnknownField(#[from] UnknownCampField),

    /// Field is reserved for the ministry
    #[error("field {0} cannot be changed from the camp form")]
    ReadOnly(CampField),

    /// Malformed `field=value` assignment
    #[error("expected field=value, got {0:?}")]
    MalformedAssignment(String),

    /// Field value failed validation
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        /// Offending field
        field: CampField,

        /// Human-readable reason
        reason: &'static str,
    },
}

/// Partial camp update. `None` leaves the stored value untouched; an empty
/// string clears a text field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampUpdate {
    /// Organisation name
    pub name: Option<String>,
    /// Legal form
    pub legal_form: Option<String>,
    /// Ownership type
    pub ownership_type: Option<String>,
    /// Municipality
    pub municipality: Option<String>,
    /// Tax id
    pub inn: Option<String>,
    /// Territory code
    pub oktmo: Option<String>,
    /// Registry code
    pub registry_code: Option<String>,
    /// Facility address
    pub address: Option<String>,
    /// Legal address
    pub legal_address: Option<String>,
    /// Director name
    pub director_name: Option<String>,
    /// Phone
    pub phone: Option<String>,
    /// Email. Empty clears it, and accounts linked by email lose the camp.
    pub email: Option<String>,
    /// Website
    pub website: Option<String>,
    /// Camp type
    pub camp_type: Option<String>,
    /// Seasonality
    pub seasonality: Option<String>,
    /// Shift dates
    pub shift_dates: Option<String>,
    /// Capacity
    pub capacity: Option<u32>,
    /// Ticket cost
    pub ticket_cost: Option<u64>,
    /// Age category
    pub age_category: Option<String>,
    /// Accessibility
    pub accessibility: Option<String>,
    /// Sanitary certificate number
    pub sanitary_number: Option<String>,
    /// Sanitary certificate date
    pub sanitary_date: Option<String>,
    /// Medical license
    pub medical_license: Option<String>,
    /// Education license
    pub education_license: Option<String>,
    /// Inspection results
    pub inspection_results: Option<String>,
    /// Swimming facility
    pub has_swimming: Option<bool>,
}

impl CampUpdate {
    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Parse and apply a `field=value` assignment. Field names may use the
    /// form (camelCase) or column (snake_case) spelling.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed assignments, unknown or read-only
    /// fields and values that do not parse.
    pub fn assign(&mut self, assignment: &str) -> Result<(), CampUpdateError> {
        let (field, value) = assignment
            .split_once('=')
            .ok_or_else(|| CampUpdateError::MalformedAssignment(assignment.to_string()))?;

        self.set(field.parse()?, value.trim())
    }

    /// Set one field from its textual value.
    ///
    /// # Errors
    ///
    /// Returns an error for read-only fields and values that do not parse.
    pub fn set(&mut self, field: CampField, value: &str) -> Result<(), CampUpdateError> {
        let text = Some(value.to_string());

        match field {
            CampField::Name => self.name = text,
            CampField::LegalForm => self.legal_form = text,
            CampField::OwnershipType => self.ownership_type = text,
            CampField::Municipality => self.municipality = text,
            CampField::Inn => self.inn = text,
            CampField::Oktmo => self.oktmo = text,
            CampField::RegistryCode => self.registry_code = text,
            CampField::Address => self.address = text,
            CampField::LegalAddress => self.legal_address = text,
            CampField::DirectorName => self.director_name = text,
            CampField::Phone => self.phone = text,
            CampField::Email => self.email = text,
            CampField::Website => self.website = text,
            CampField::CampType => self.camp_type = text,
            CampField::Seasonality => self.seasonality = text,
            CampField::ShiftDates => self.shift_dates = text,
            CampField::AgeCategory => self.age_category = text,
            CampField::Accessibility => self.accessibility = text,
            CampField::SanitaryNumber => self.sanitary_number = text,
            CampField::SanitaryDate => self.sanitary_date = text,
            CampField::MedicalLicense => self.medical_license = text,
            CampField::EducationLicense => self.education_license = text,
            CampField::InspectionResults => self.inspection_results = text,
            CampField::Capacity => {
                self.capacity = Some(value.parse().map_err(|_parse| CampUpdateError::Invalid {
                    field,
                    reason: "expected a non-negative whole number",
                })?);
            }
            CampField::TicketCost => {
                self.ticket_cost =
                    Some(value.parse().map_err(|_parse| CampUpdateError::Invalid {
                        field,
                        reason: "expected a non-negative whole number",
                    })?);
            }
            CampField::HasSwimming => self.has_swimming = Some(parse_flag(field, value)?),
            CampField::IsVerified | CampField::InclusionDate => {
                return Err(CampUpdateError::ReadOnly(field));
            }
        }

        Ok(())
    }

    /// Validate every present field.
    ///
    /// # Errors
    ///
    /// Returns the first failing field, or [`CampUpdateError::Empty`] when
    /// nothing is set.
    pub fn validate(&self) -> Result<(), CampUpdateError> {
        if self.is_empty() {
            return Err(CampUpdateError::Empty);
        }

        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            return Err(CampUpdateError::Invalid {
                field: CampField::Name,
                reason: "name is required",
            });
        }

        if let Some(inn) = &self.inn {
            check_digits(CampField::Inn, inn, &[10, 12])?;
        }

        if let Some(oktmo) = &self.oktmo {
            check_digits(CampField::Oktmo, oktmo, &[8, 11])?;
        }

        if let Some(email) = &self.email {
            check_email(email)?;
        }

        if let Some(website) = &self.website {
            let website = website.trim();

            if !website.is_empty()
                && !(website.starts_with("http://") || website.starts_with("https://"))
            {
                return Err(CampUpdateError::Invalid {
                    field: CampField::Website,
                    reason: "must start with http:// or https://",
                });
            }
        }

        Ok(())
    }

    /// Merge the present fields into `camp`.
    pub fn apply_to(&self, camp: &mut Camp) {
        merge(&mut camp.name, self.name.as_ref());
        merge(&mut camp.legal_form, self.legal_form.as_ref());
        merge(&mut camp.ownership_type, self.ownership_type.as_ref());
        merge(&mut camp.municipality, self.municipality.as_ref());
        merge(&mut camp.inn, self.inn.as_ref());
        merge(&mut camp.oktmo, self.oktmo.as_ref());
        merge(&mut camp.registry_code, self.registry_code.as_ref());
        merge(&mut camp.address, self.address.as_ref());
        merge(&mut camp.legal_address, self.legal_address.as_ref());
        merge(&mut camp.director_name, self.director_name.as_ref());
        merge(&mut camp.phone, self.phone.as_ref());
        merge(&mut camp.email, self.email.as_ref());
        merge(&mut camp.website, self.website.as_ref());
        merge(&mut camp.camp_type, self.camp_type.as_ref());
        merge(&mut camp.seasonality, self.seasonality.as_ref());
        merge(&mut camp.shift_dates, self.shift_dates.as_ref());
        merge(&mut camp.capacity, self.capacity.as_ref());
        merge(&mut camp.ticket_cost, self.ticket_cost.as_ref());
        merge(&mut camp.age_category, self.age_category.as_ref());
        merge(&mut camp.accessibility, self.accessibility.as_ref());
        merge(&mut camp.sanitary_number, self.sanitary_number.as_ref());
        merge(&mut camp.sanitary_date, self.sanitary_date.as_ref());
        merge(&mut camp.medical_license, self.medical_license.as_ref());
        merge(&mut camp.education_license, self.education_license.as_ref());
        merge(&mut camp.inspection_results, self.inspection_results.as_ref());
        merge(&mut camp.has_swimming, self.has_swimming.as_ref());
    }
}

fn merge<T: Clone>(target: &mut T, value: Option<&T>) {
    if let Some(value) = value {
        target.clone_from(value);
    }
}

fn parse_flag(field: CampField, value: &str) -> Result<bool, CampUpdateError> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" | "да" => Ok(true),
        "false" | "no" | "0" | "нет" => Ok(false),
        _ => Err(CampUpdateError::Invalid {
            field,
            reason: "expected true or false",
        }),
    }
}

fn check_digits(field: CampField, value: &str, lengths: &[usize]) -> Result<(), CampUpdateError> {
    let value = value.trim();

    if value.is_empty() {
        return Ok(());
    }

    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(CampUpdateError::Invalid {
            field,
            reason: "must contain digits only",
        });
    }

    if !lengths.contains(&value.len()) {
        return Err(CampUpdateError::Invalid {
            field,
            reason: "has an unexpected number of digits",
        });
    }

    Ok(())
}

fn check_email(value: &str) -> Result<(), CampUpdateError> {
    let invalid = CampUpdateError::Invalid {
        field: CampField::Email,
        reason: "must look like name@domain",
    };

    let value = value.trim();

    if value.is_empty() {
        return Ok(());
    }

    let Some((local, domain)) = value.split_once('@') else {
        return Err(invalid);
    };

    if local.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.')
    {
        return Err(invalid);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn empty_update_is_rejected() {
        assert_eq!(CampUpdate::default().validate(), Err(CampUpdateError::Empty));
    }

    #[test]
    fn assign_accepts_form_and_column_names() -> TestResult {
        let mut update = CampUpdate::default();

        update.assign("directorName=Петрова Анна Сергеевна")?;
        update.assign("ticket_cost = 45000")?;
        update.assign("hasSwimming=да")?;

        assert_eq!(
            update.director_name.as_deref(),
            Some("Петрова Анна Сергеевна")
        );
        assert_eq!(update.ticket_cost, Some(45_000));
        assert_eq!(update.has_swimming, Some(true));

        Ok(())
    }

    #[test]
    fn assign_refuses_verification_flag() {
        let mut update = CampUpdate::default();

        let result = update.assign("isVerified=true");

        assert_eq!(
            result,
            Err(CampUpdateError::ReadOnly(CampField::IsVerified))
        );
    }

    #[test]
    fn assign_without_equals_is_malformed() {
        let mut update = CampUpdate::default();

        assert!(matches!(
            update.assign("name"),
            Err(CampUpdateError::MalformedAssignment(_))
        ));
    }

    #[test]
    fn capacity_must_be_numeric() {
        let mut update = CampUpdate::default();

        let result = update.set(CampField::Capacity, "много");

        assert!(
            matches!(
                result,
                Err(CampUpdateError::Invalid {
                    field: CampField::Capacity,
                    ..
                })
            ),
            "expected invalid capacity, got {result:?}"
        );
    }

    #[test]
    fn blank_name_fails_validation() {
        let update = CampUpdate {
            name: Some("   ".to_string()),
            ..CampUpdate::default()
        };

        assert!(matches!(
            update.validate(),
            Err(CampUpdateError::Invalid {
                field: CampField::Name,
                ..
            })
        ));
    }

    #[test]
    fn inn_checks_length_and_digits() {
        let short = CampUpdate {
            inn: Some("48260".to_string()),
            ..CampUpdate::default()
        };
        let letters = CampUpdate {
            inn: Some("48260O1234".to_string()),
            ..CampUpdate::default()
        };
        let cleared = CampUpdate {
            inn: Some(String::new()),
            ..CampUpdate::default()
        };

        assert!(short.validate().is_err(), "5 digits is not an INN");
        assert!(letters.validate().is_err(), "letters are not digits");
        assert!(cleared.validate().is_ok(), "clearing the INN is allowed");
    }

    #[test]
    fn email_and_website_are_checked() {
        let email = CampUpdate {
            email: Some("camp.lipetsk.ru".to_string()),
            ..CampUpdate::default()
        };
        let website = CampUpdate {
            website: Some("star.lipetsk.ru".to_string()),
            ..CampUpdate::default()
        };

        assert!(email.validate().is_err(), "email without @");
        assert!(website.validate().is_err(), "website without scheme");
    }

    #[test]
    fn email_can_be_cleared() -> TestResult {
        let mut camp = Camp {
            email: "zvezdny@lipetsk.ru".to_string(),
            ..Camp::default()
        };
        let mut update = CampUpdate::default();

        update.assign("email=  ")?;
        update.validate()?;
        update.apply_to(&mut camp);

        assert!(camp.email.is_empty(), "email kept: {}", camp.email);
        assert!(!camp.matches_email("zvezdny@lipetsk.ru"));

        Ok(())
    }

    #[test]
    fn apply_merges_only_present_fields() {
        let mut camp = Camp {
            name: "ДОЛ \"Березка\"".to_string(),
            phone: "+7 (4742) 22-22-22".to_string(),
            capacity: 120,
            is_verified: true,
            ..Camp::default()
        };

        let update = CampUpdate {
            sanitary_number: Some("48.ОЦ.01.000.М.000222.05.24".to_string()),
            capacity: Some(140),
            ..CampUpdate::default()
        };

        update.apply_to(&mut camp);

        assert_eq!(camp.sanitary_number, "48.ОЦ.01.000.М.000222.05.24");
        assert_eq!(camp.capacity, 140);
        assert_eq!(camp.phone, "+7 (4742) 22-22-22");
        assert!(camp.is_verified, "verification flag must be untouched");
    }
}
