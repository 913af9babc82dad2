use serde::{Deserialize, Serialize};
use validator::Validate;

use super::null_as_default;
use crate::resource::{Resource, ResourceKind};
use crate::validation::validate_required_text;

/// Estate staff member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, alias = "empid", deserialize_with = "null_as_default")]
    pub employee_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contact: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EmployeeForm {
    #[serde(default)]
    #[validate(custom = "validate_required_text")]
    pub name: String,
    #[serde(default, alias = "empid")]
    #[validate(custom = "validate_required_text")]
    pub employee_id: String,
    #[serde(default)]
    #[validate(custom = "validate_required_text")]
    pub role: String,
    #[serde(default)]
    #[validate(custom = "validate_required_text")]
    pub contact: String,
}

impl Resource for Employee {
    const KIND: ResourceKind = ResourceKind::Employees;
    type Form = EmployeeForm;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_form(&self) -> EmployeeForm {
        EmployeeForm {
            name: self.name.clone(),
            employee_id: self.employee_id.clone(),
            role: self.role.clone(),
            contact: self.contact.clone(),
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.role]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete_form() -> EmployeeForm {
        EmployeeForm {
            name: "Vishwa Jayasinghe".into(),
            employee_id: "E9023".into(),
            role: "Manager".into(),
            contact: "vishwa@example.com".into(),
        }
    }

    #[test]
    fn complete_form_is_valid() {
        assert!(Employee::check(&complete_form()).is_ok());
    }

    #[test]
    fn every_required_field_is_enforced() {
        let blanks: [fn(&mut EmployeeForm); 4] = [
            |f| f.name.clear(),
            |f| f.employee_id = "  ".into(),
            |f| f.role.clear(),
            |f| f.contact.clear(),
        ];
        for blank in blanks {
            let mut form = complete_form();
            blank(&mut form);
            assert!(Employee::check(&form).is_err(), "{:?} should be rejected", form);
        }
    }

    #[test]
    fn reads_legacy_empid_key() {
        let employee: Employee = serde_json::from_value(json!({
            "_id": "65a1",
            "name": "Amal Perera",
            "empid": "E2345",
            "role": "Supervisor",
            "contact": "amal@example.com"
        }))
        .unwrap();
        assert_eq!(employee.employee_id, "E2345");
        assert_eq!(employee.to_form().employee_id, "E2345");
    }

    #[test]
    fn form_serialises_with_wire_names() {
        let body = serde_json::to_value(complete_form()).unwrap();
        assert_eq!(body["employeeId"], "E9023");
        assert!(body.get("employee_id").is_none());
    }
}
