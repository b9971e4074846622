use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StandardRow {
    pub code: String,
    pub title: String,
    pub description: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ModuleRow {
    pub standard_code: String,
    pub module_id: String,
    pub title: String,
    pub duration: String,
    pub is_practical: bool,
    pub position: i32,
}

/// A single learning unit. Position in `Standard::modules` gates the next one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub id: String,
    pub title: String,
    pub duration: String,
    pub is_practical: bool,
}

/// A competency standard with its modules in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standard {
    pub code: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub modules: Vec<Module>,
}

impl Standard {
    /// Assembles a standard from its row and module rows (any order; sorted by position).
    pub fn from_rows(row: StandardRow, mut modules: Vec<ModuleRow>) -> Self {
        modules.sort_by_key(|m| m.position);
        Standard {
            code: row.code,
            title: row.title,
            description: row.description,
            category: row.category,
            modules: modules
                .into_iter()
                .map(|m| Module {
                    id: m.module_id,
                    title: m.title,
                    duration: m.duration,
                    is_practical: m.is_practical,
                })
                .collect(),
        }
    }

    pub fn module_index(&self, module_id: &str) -> Option<usize> {
        self.modules.iter().position(|m| m.id == module_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobOpening {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub required_standard_codes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateProfile {
    pub id: Uuid,
    pub full_name: String,
    pub headline: String,
    pub location: String,
    pub certified_codes: Vec<String>,
}

/// Row of the `badge_benefits` table, joined onto badges by `badge_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BadgeBenefitRow {
    pub badge_id: String,
    pub discount_pct: i32,
    pub premium_access_days: i32,
    pub special_features: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module_row(id: &str, position: i32) -> ModuleRow {
        ModuleRow {
            standard_code: "EC0217.01".to_string(),
            module_id: id.to_string(),
            title: format!("Module {id}"),
            duration: "2h".to_string(),
            is_practical: false,
            position,
        }
    }

    #[test]
    fn test_from_rows_orders_modules_by_position() {
        let row = StandardRow {
            code: "EC0217.01".to_string(),
            title: "Impartición de cursos".to_string(),
            description: "Group training delivery".to_string(),
            category: "education".to_string(),
        };
        let standard = Standard::from_rows(
            row,
            vec![module_row("m3", 3), module_row("m1", 1), module_row("m2", 2)],
        );
        let ids: Vec<_> = standard.modules.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2", "m3"]);
        assert_eq!(standard.module_index("m2"), Some(1));
        assert_eq!(standard.module_index("missing"), None);
    }
}
