//! Header and status normalization for spreadsheet imports

use crate::models::enums::EquipmentStatus;

/// Canonical column an import header maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Name,
    Type,
    Status,
    PurchaseDate,
    ImageUrl,
}

const HEADER_ALIASES: &[(&str, Column)] = &[
    ("name", Column::Name),
    ("equipment name", Column::Name),
    ("equipment", Column::Name),
    ("item name", Column::Name),
    ("item", Column::Name),
    ("asset name", Column::Name),
    ("type", Column::Type),
    ("equipment type", Column::Type),
    ("category", Column::Type),
    ("asset type", Column::Type),
    ("status", Column::Status),
    ("condition", Column::Status),
    ("state", Column::Status),
    ("purchasedate", Column::PurchaseDate),
    ("purchase date", Column::PurchaseDate),
    ("date of purchase", Column::PurchaseDate),
    ("date purchased", Column::PurchaseDate),
    ("purchased on", Column::PurchaseDate),
    ("acquisition date", Column::PurchaseDate),
    ("imageurl", Column::ImageUrl),
    ("image url", Column::ImageUrl),
    ("image", Column::ImageUrl),
    ("photo", Column::ImageUrl),
    ("picture", Column::ImageUrl),
];

const STATUS_SYNONYMS: &[(&str, EquipmentStatus)] = &[
    ("available", EquipmentStatus::Available),
    ("active", EquipmentStatus::Available),
    ("working", EquipmentStatus::Available),
    ("functional", EquipmentStatus::Available),
    ("operational", EquipmentStatus::Available),
    ("ok", EquipmentStatus::Available),
    ("good", EquipmentStatus::Available),
    ("new", EquipmentStatus::Available),
    ("in use", EquipmentStatus::InUse),
    ("inuse", EquipmentStatus::InUse),
    ("using", EquipmentStatus::InUse),
    ("assigned", EquipmentStatus::InUse),
    ("issued", EquipmentStatus::InUse),
    ("occupied", EquipmentStatus::InUse),
    ("needs repair", EquipmentStatus::NeedsRepair),
    ("repair", EquipmentStatus::NeedsRepair),
    ("faulty", EquipmentStatus::NeedsRepair),
    ("broken", EquipmentStatus::NeedsRepair),
    ("damaged", EquipmentStatus::NeedsRepair),
    ("out of order", EquipmentStatus::NeedsRepair),
    ("maintenance", EquipmentStatus::NeedsRepair),
    ("under maintenance", EquipmentStatus::NeedsRepair),
    ("under repair", EquipmentStatus::NeedsRepair),
    ("discarded", EquipmentStatus::Discarded),
    ("disposed", EquipmentStatus::Discarded),
    ("retired", EquipmentStatus::Discarded),
    ("scrapped", EquipmentStatus::Discarded),
    ("condemned", EquipmentStatus::Discarded),
    ("written off", EquipmentStatus::Discarded),
];

/// Lowercase, strip a UTF-8 BOM, treat `_`/`-` as spaces and collapse runs of whitespace
pub fn normalize_key(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}')
        .to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn column_for_header(raw: &str) -> Option<Column> {
    let key = normalize_key(raw);
    HEADER_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, column)| *column)
}

/// Map a free-text status onto the fixed set; `None` when unrecognized
pub fn normalize_status(raw: &str) -> Option<EquipmentStatus> {
    let key = normalize_key(raw);
    STATUS_SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == key)
        .map(|(_, status)| *status)
}
