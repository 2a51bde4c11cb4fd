//! Built-in departments and their entity schemas

use super::{EntitySchema, FieldSpec, RecordOrdering, DISPLAY_ORDER_FIELD};
use crate::models::department::DepartmentSeed;

const UAF: &str = "University of Agriculture, Faisalabad";

pub static ENTOMOLOGY: DepartmentSeed = DepartmentSeed {
    id: "entomology",
    name: "Department of Entomology",
    location: UAF,
    focal_person: None,
    contact: None,
};

pub static AGRONOMY: DepartmentSeed = DepartmentSeed {
    id: "agronomy",
    name: "Department of Agronomy",
    location: UAF,
    focal_person: None,
    contact: None,
};

pub static PLANT_PATHOLOGY: DepartmentSeed = DepartmentSeed {
    id: "plant-pathology",
    name: "Department of Plant Pathology",
    location: UAF,
    focal_person: None,
    contact: None,
};

pub static SOIL_SCIENCE: DepartmentSeed = DepartmentSeed {
    id: "soil-science",
    name: "Institute of Soil and Environmental Sciences",
    location: UAF,
    focal_person: None,
    contact: None,
};

pub static CRI: DepartmentSeed = DepartmentSeed {
    id: "cri",
    name: "Cotton Research Institute, Multan",
    location: "Old Shujabad Road, Multan",
    focal_person: Some("Director, Cotton Research Institute"),
    contact: Some("061-9200341"),
};

pub static RARI: DepartmentSeed = DepartmentSeed {
    id: "rari",
    name: "Regional Agricultural Research Institute, Bahawalpur",
    location: "Bahawalpur",
    focal_person: Some("Director, RARI"),
    contact: None,
};

pub static ADAPTIVE_RESEARCH: DepartmentSeed = DepartmentSeed {
    id: "adaptive-research",
    name: "Adaptive Research Farm",
    location: "Faisalabad",
    focal_person: None,
    contact: None,
};

/// Reference departments upserted by the seeder
pub static DEPARTMENTS: [&DepartmentSeed; 7] = [
    &ENTOMOLOGY,
    &AGRONOMY,
    &PLANT_PATHOLOGY,
    &SOIL_SCIENCE,
    &CRI,
    &RARI,
    &ADAPTIVE_RESEARCH,
];

// Sanctioned-strength tables share one layout across institutes.
const POSITION_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("designation", "Designation").required().max(200),
    FieldSpec::text("bpsScale", "BPS Scale").required().max(10),
    FieldSpec::integer("sanctionedPosts", "Sanctioned Posts").required(),
    FieldSpec::integer("filledPosts", "Filled Posts"),
    FieldSpec::integer("vacantPosts", "Vacant Posts"),
    FieldSpec::text("incumbentName", "Name of Incumbent"),
    FieldSpec::text("remarks", "Remarks").max(2000),
    FieldSpec::integer(DISPLAY_ORDER_FIELD, "Display Order"),
];

const ASSET_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("assetName", "Asset Name").required().max(200),
    FieldSpec::text("category", "Category").required(),
    FieldSpec::integer("quantity", "Quantity"),
    FieldSpec::status(),
    FieldSpec::date("purchaseDate", "Date of Purchase"),
    FieldSpec::decimal("cost", "Cost (PKR)"),
    FieldSpec::text("location", "Location"),
    FieldSpec::text("remarks", "Remarks").max(2000),
];

static SCHEMAS: &[EntitySchema] = &[
    EntitySchema {
        kind: "adaptive-research-positions",
        label: "Adaptive Research Positions",
        department: &ADAPTIVE_RESEARCH,
        title_field: "designation",
        ordering: RecordOrdering::DisplayOrder,
        fields: POSITION_FIELDS,
    },
    EntitySchema {
        kind: "cri-positions",
        label: "CRI Multan Positions",
        department: &CRI,
        title_field: "designation",
        ordering: RecordOrdering::DisplayOrder,
        fields: POSITION_FIELDS,
    },
    EntitySchema {
        kind: "cri-assets",
        label: "CRI Multan Assets",
        department: &CRI,
        title_field: "assetName",
        ordering: RecordOrdering::Recent,
        fields: ASSET_FIELDS,
    },
    EntitySchema {
        kind: "rari-assets",
        label: "RARI Bahawalpur Assets",
        department: &RARI,
        title_field: "assetName",
        ordering: RecordOrdering::Recent,
        fields: ASSET_FIELDS,
    },
    EntitySchema {
        kind: "rari-projects",
        label: "RARI Research Projects",
        department: &RARI,
        title_field: "projectTitle",
        ordering: RecordOrdering::Recent,
        fields: &[
            FieldSpec::text("projectTitle", "Project Title").required().max(300),
            FieldSpec::text("principalInvestigator", "Principal Investigator").required(),
            FieldSpec::text("fundingAgency", "Funding Agency"),
            FieldSpec::date("startDate", "Start Date"),
            FieldSpec::date("endDate", "End Date"),
            FieldSpec::decimal("budget", "Budget (PKR)"),
            FieldSpec::text("remarks", "Remarks").max(2000),
        ],
    },
    EntitySchema {
        kind: "entomology-equipment",
        label: "Entomology Lab Equipment",
        department: &ENTOMOLOGY,
        title_field: "equipmentName",
        ordering: RecordOrdering::Recent,
        fields: &[
            FieldSpec::text("equipmentName", "Equipment Name").required().max(200),
            FieldSpec::text("model", "Model"),
            FieldSpec::text("manufacturer", "Manufacturer"),
            FieldSpec::text("serialNumber", "Serial Number"),
            FieldSpec::integer("quantity", "Quantity"),
            FieldSpec::status(),
            FieldSpec::date("purchaseDate", "Date of Purchase"),
            FieldSpec::text("lab", "Laboratory"),
        ],
    },
    EntitySchema {
        kind: "entomology-facilities",
        label: "Entomology Facilities",
        department: &ENTOMOLOGY,
        title_field: "facilityName",
        ordering: RecordOrdering::Recent,
        fields: &[
            FieldSpec::text("facilityName", "Facility Name").required().max(200),
            FieldSpec::text("facilityType", "Facility Type").required(),
            FieldSpec::integer("capacity", "Capacity"),
            FieldSpec::status(),
            FieldSpec::text("location", "Location"),
            FieldSpec::email("contactEmail", "Contact Email"),
        ],
    },
    EntitySchema {
        kind: "agronomy-stock",
        label: "Agronomy Stock Items",
        department: &AGRONOMY,
        title_field: "itemName",
        ordering: RecordOrdering::Recent,
        fields: &[
            FieldSpec::text("itemName", "Item Name").required().max(200),
            FieldSpec::text("unit", "Unit").required().max(20),
            FieldSpec::decimal("quantity", "Quantity").required(),
            FieldSpec::decimal("reorderLevel", "Reorder Level"),
            FieldSpec::text("supplier", "Supplier"),
            FieldSpec::date("lastRestocked", "Last Restocked"),
        ],
    },
    EntitySchema {
        kind: "agronomy-facilities",
        label: "Agronomy Field Facilities",
        department: &AGRONOMY,
        title_field: "facilityName",
        ordering: RecordOrdering::Recent,
        fields: &[
            FieldSpec::text("facilityName", "Facility Name").required().max(200),
            FieldSpec::text("facilityType", "Facility Type").required(),
            FieldSpec::decimal("areaAcres", "Area (acres)"),
            FieldSpec::boolean("irrigated", "Irrigated"),
            FieldSpec::status(),
            FieldSpec::text("location", "Location"),
        ],
    },
    EntitySchema {
        kind: "soil-science-equipment",
        label: "Soil Science Lab Equipment",
        department: &SOIL_SCIENCE,
        title_field: "equipmentName",
        ordering: RecordOrdering::Recent,
        fields: &[
            FieldSpec::text("equipmentName", "Equipment Name").required().max(200),
            FieldSpec::text("model", "Model"),
            FieldSpec::text("manufacturer", "Manufacturer"),
            FieldSpec::status(),
            FieldSpec::date("purchaseDate", "Date of Purchase"),
            FieldSpec::date("lastCalibrated", "Last Calibrated"),
            FieldSpec::text("lab", "Laboratory"),
        ],
    },
    EntitySchema {
        kind: "plant-pathology-assets",
        label: "Plant Pathology Assets",
        department: &PLANT_PATHOLOGY,
        title_field: "assetName",
        ordering: RecordOrdering::Recent,
        fields: ASSET_FIELDS,
    },
    EntitySchema {
        kind: "plant-pathology-positions",
        label: "Plant Pathology Positions",
        department: &PLANT_PATHOLOGY,
        title_field: "designation",
        ordering: RecordOrdering::DisplayOrder,
        fields: POSITION_FIELDS,
    },
];

pub fn schemas() -> &'static [EntitySchema] {
    SCHEMAS
}

pub fn find_schema(kind: &str) -> Option<&'static EntitySchema> {
    SCHEMAS.iter().find(|s| s.kind == kind)
}
