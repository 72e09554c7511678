//! Static schema description for every hosted collection. Services derive
//! their fetch field lists from these tables instead of assembling ad-hoc
//! field arrays per call; `validate_all` runs once at startup.

use crate::error::{FieldhandError, FieldhandResult};
use crate::records::envelope::{FetchQuery, QueryFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Id,
    Text,
    Number,
    Bool,
    Date,
    DateTime,
    Lookup,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, kind: FieldKind) -> FieldDef {
    FieldDef { name, kind }
}

#[derive(Debug)]
pub struct EntitySchema {
    pub collection: &'static str,
    pub fields: &'static [FieldDef],
}

impl EntitySchema {
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    pub fn query(&self) -> FetchQuery {
        FetchQuery::select(self.field_names())
    }

    pub fn query_where(&self, filter: QueryFilter) -> FetchQuery {
        self.query().and_where(filter)
    }

    pub fn validate(&self) -> FieldhandResult<()> {
        if self.collection.is_empty() {
            return Err(FieldhandError::Config(
                "Schema has an empty collection name".to_string(),
            ));
        }

        let id_fields = self
            .fields
            .iter()
            .filter(|f| matches!(f.kind, FieldKind::Id))
            .count();
        if id_fields != 1 {
            return Err(FieldhandError::Config(format!(
                "{}: expected exactly one Id field, found {}",
                self.collection, id_fields
            )));
        }

        for (index, field) in self.fields.iter().enumerate() {
            if field.name.is_empty() {
                return Err(FieldhandError::Config(format!(
                    "{}: field {} has an empty name",
                    self.collection, index
                )));
            }
            if self.fields[..index].iter().any(|f| f.name == field.name) {
                return Err(FieldhandError::Config(format!(
                    "{}: duplicate field {}",
                    self.collection, field.name
                )));
            }
        }

        Ok(())
    }
}

pub static FARM: EntitySchema = EntitySchema {
    collection: "farm_c",
    fields: &[
        field("Id", FieldKind::Id),
        field("Name", FieldKind::Text),
        field("name_c", FieldKind::Text),
        field("location_c", FieldKind::Text),
        field("total_area_c", FieldKind::Number),
        field("unit_c", FieldKind::Text),
        field("notes_c", FieldKind::Text),
        field("CreatedOn", FieldKind::DateTime),
    ],
};

pub static CROP: EntitySchema = EntitySchema {
    collection: "crop_c",
    fields: &[
        field("Id", FieldKind::Id),
        field("Name", FieldKind::Text),
        field("crop_name_c", FieldKind::Text),
        field("variety_c", FieldKind::Text),
        field("planting_date_c", FieldKind::Date),
        field("expected_harvest_date_c", FieldKind::Date),
        field("area_planted_c", FieldKind::Number),
        field("status_c", FieldKind::Text),
        field("notes_c", FieldKind::Text),
        field("farm_id_c", FieldKind::Lookup),
    ],
};

pub static EXPENSE: EntitySchema = EntitySchema {
    collection: "expense_c",
    fields: &[
        field("Id", FieldKind::Id),
        field("Name", FieldKind::Text),
        field("date_c", FieldKind::Date),
        field("category_c", FieldKind::Text),
        field("amount_c", FieldKind::Number),
        field("description_c", FieldKind::Text),
        field("farm_id_c", FieldKind::Lookup),
    ],
};

pub static INCOME: EntitySchema = EntitySchema {
    collection: "income_c",
    fields: &[
        field("Id", FieldKind::Id),
        field("Name", FieldKind::Text),
        field("date_c", FieldKind::Date),
        field("crop_id_c", FieldKind::Lookup),
        field("quantity_c", FieldKind::Number),
        field("price_per_unit_c", FieldKind::Number),
        field("buyer_c", FieldKind::Text),
        field("total_amount_c", FieldKind::Number),
    ],
};

pub static TASK: EntitySchema = EntitySchema {
    collection: "task_c",
    fields: &[
        field("Id", FieldKind::Id),
        field("Name", FieldKind::Text),
        field("title_c", FieldKind::Text),
        field("description_c", FieldKind::Text),
        field("due_date_c", FieldKind::Date),
        field("priority_c", FieldKind::Text),
        field("completed_c", FieldKind::Bool),
        field("completed_at_c", FieldKind::DateTime),
        field("farm_id_c", FieldKind::Lookup),
        field("crop_id_c", FieldKind::Lookup),
    ],
};

pub fn registry() -> [&'static EntitySchema; 5] {
    [&FARM, &CROP, &EXPENSE, &INCOME, &TASK]
}

pub fn validate_all() -> FieldhandResult<()> {
    for schema in registry() {
        schema.validate()?;
    }
    Ok(())
}
