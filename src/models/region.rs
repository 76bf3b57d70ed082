use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::constants::TOTAL_REGIONS;

/// Region names indexed by `id - 1`, in the provider's province numbering.
pub const REGION_NAMES: [&str; TOTAL_REGIONS] = [
    "Черкаська",
    "Чернігівська",
    "Чернівецька",
    "Республіка Крим",
    "Дніпропетровська",
    "Донецька",
    "Івано-Франківська",
    "Харківська",
    "Херсонська",
    "Хмельницька",
    "Київська",
    "Київ",
    "Кіровоградська",
    "Луганська",
    "Львівська",
    "Миколаївська",
    "Одеська",
    "Полтавська",
    "Рівненська",
    "Севастопольська",
    "Сумська",
    "Тернопільська",
    "Закарпатська",
    "Вінницька",
    "Волинська",
    "Запорізька",
    "Житомирська",
];

/// Look up the display name of a region id (1-based).
pub fn region_name(id: u32) -> Option<&'static str> {
    let index = usize::try_from(id).ok()?.checked_sub(1)?;
    REGION_NAMES.get(index).copied()
}

/// The `area` column: a numeric region id until relabeling, a display name after.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Area {
    Id(u32),
    Name(String),
}

impl Area {
    /// Interpret a textual area: all-digit text is an id, anything else a name.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        match trimmed.parse::<u32>() {
            Ok(id) => Area::Id(id),
            Err(_) => Area::Name(trimmed.to_string()),
        }
    }

    /// The relabeled form of this area. Ids without an entry are returned unchanged.
    pub fn relabeled(&self) -> Self {
        match self {
            Area::Id(id) => region_name(*id)
                .map(|name| Area::Name(name.to_string()))
                .unwrap_or(Area::Id(*id)),
            Area::Name(_) => self.clone(),
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Area::Id(id) => write!(f, "{}", id),
            Area::Name(name) => f.write_str(name),
        }
    }
}

impl From<u32> for Area {
    fn from(id: u32) -> Self {
        Area::Id(id)
    }
}

impl From<&str> for Area {
    fn from(name: &str) -> Self {
        Area::Name(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_name_lookup() {
        assert_eq!(region_name(1), Some("Черкаська"));
        assert_eq!(region_name(12), Some("Київ"));
        assert_eq!(region_name(27), Some("Житомирська"));
        assert_eq!(region_name(0), None);
        assert_eq!(region_name(28), None);
    }

    #[test]
    fn test_area_parse() {
        assert_eq!(Area::parse(" 7 "), Area::Id(7));
        assert_eq!(Area::parse("Київ"), Area::Name("Київ".to_string()));
        assert_eq!(Area::parse("-3"), Area::Name("-3".to_string()));
    }

    #[test]
    fn test_relabel_unknown_id_passes_through() {
        assert_eq!(Area::Id(99).relabeled(), Area::Id(99));
        assert_eq!(Area::Id(5).relabeled(), Area::from("Дніпропетровська"));
        assert_eq!(Area::from("Одеська").relabeled(), Area::from("Одеська"));
    }
}
