use std::path::Path;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Declared layout of a settlement bill.
#[must_use]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SettlementTemplate {
    /// Header keyword of the subject column.
    #[serde(default = "default_subject_keyword")]
    pub subject_keyword: String,

    pub fields: Vec<Field>,

    /// Classification table, the first matching pattern wins.
    pub subjects: Vec<SubjectPattern>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Field {
    pub name: String,

    /// Header cell keywords, any of them identifies the column.
    pub keywords: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubjectPattern {
    pub pattern: String,
    pub canonical: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Subject {
    Matched(String),
    Unmatched,
}

fn default_subject_keyword() -> String {
    "科目".to_owned()
}

impl Default for SettlementTemplate {
    fn default() -> Self {
        let field = |name: &str, keywords: &[&str]| Field {
            name: name.to_owned(),
            keywords: keywords.iter().map(|keyword| (*keyword).to_owned()).collect(),
        };
        let subject = |pattern: &str, canonical: &str| SubjectPattern {
            pattern: pattern.to_owned(),
            canonical: canonical.to_owned(),
        };
        Self {
            subject_keyword: default_subject_keyword(),
            fields: vec![
                field("电量", &["电量", "结算电量"]),
                field("电价", &["电价", "均价", "单价"]),
                field("电费", &["电费", "金额"]),
            ],
            subjects: vec![
                subject("优先发电", "优先发电交易"),
                subject("保障性", "保障性电量"),
                subject("机制电量", "机制电量"),
                subject("中长期", "中长期合约"),
                subject("日前", "现货日前"),
                subject("实时", "现货实时"),
                subject("偏差", "偏差考核"),
                subject("辅助服务", "辅助服务分摊"),
            ],
        }
    }
}

impl SettlementTemplate {
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn read_from(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read the template `{}`", path.display()))?;
        let template: Self = toml::from_str(&text)
            .with_context(|| format!("failed to parse the template `{}`", path.display()))?;
        ensure!(!template.fields.is_empty(), "the template declares no fields");
        info!(n_fields = template.fields.len(), n_subjects = template.subjects.len(), "loaded the template");
        Ok(template)
    }

    /// Case-insensitive containment match against the pattern table.
    pub fn classify(&self, text: &str) -> Subject {
        let text = text.to_lowercase();
        self.subjects
            .iter()
            .find(|subject| text.contains(&subject.pattern.to_lowercase()))
            .map_or(Subject::Unmatched, |subject| Subject::Matched(subject.canonical.clone()))
    }

    /// Canonical subjects in table order, without repeats.
    #[must_use]
    pub fn canonical_subjects(&self) -> Vec<&str> {
        self.subjects.iter().map(|subject| subject.canonical.as_str()).unique().collect()
    }

    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|field| field.name.as_str()).collect()
    }
}
