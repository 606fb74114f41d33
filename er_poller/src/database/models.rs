use chrono::NaiveDateTime;

/// Snapshot of one hospital's emergency equipment availability. Field order
/// here is the column order the queries bind in.
#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentRecord {
    pub hpid: String,
    pub hvventiayn: Option<bool>,
    pub hvventisoayn: Option<bool>,
    pub hvincuayn: Option<bool>,
    pub hvcrrtayn: Option<bool>,
    pub hvecmoayn: Option<bool>,
    pub hvhypoayn: Option<bool>,
    pub hvoxyayn: Option<bool>,
    pub hvctayn: Option<bool>,
    pub hvmriayn: Option<bool>,
    pub hvangioayn: Option<bool>,
    pub hvs30: Option<i32>,
    pub hvs31: Option<i32>,
    pub hvs32: Option<i32>,
    pub hvs33: Option<i32>,
    pub hvs34: Option<i32>,
    pub hvs35: Option<i32>,
    pub hvs37: Option<i32>,
    pub hvs27: Option<i32>,
    pub hvs28: Option<i32>,
    pub hvs29: Option<i32>,
}

/// Snapshot of one hospital's ICU bed counts.
#[derive(Debug, Clone, PartialEq)]
pub struct IcuRecord {
    pub hpid: String,
    pub hvcc: Option<i32>,
    pub hvncc: Option<i32>,
    pub hvccc: Option<i32>,
    pub hvicc: Option<i32>,
    pub hv2: Option<i32>,
    pub hv3: Option<i32>,
    pub hv6: Option<i32>,
    pub hv8: Option<i32>,
    pub hv9: Option<i32>,
    pub hv32: Option<i32>,
    pub hv34: Option<i32>,
    pub hv35: Option<i32>,
    pub hvs11: Option<i32>,
    pub hvs08: Option<i32>,
    pub hvs16: Option<i32>,
    pub hvs17: Option<i32>,
    pub hvs06: Option<i32>,
    pub hvs07: Option<i32>,
    pub hvs12: Option<i32>,
    pub hvs13: Option<i32>,
    pub hvs14: Option<i32>,
    pub hvs09: Option<i32>,
    pub hvs15: Option<i32>,
    pub hvs18: Option<i32>,
}

/// Snapshot of one hospital's emergency room status counts.
#[derive(Debug, Clone, PartialEq)]
pub struct EmergencyRecord {
    pub hpid: String,
    pub hvec: Option<i32>,
    pub hv27: Option<i32>,
    pub hv29: Option<i32>,
    pub hv30: Option<i32>,
    pub hv28: Option<i32>,
    pub hv15: Option<i32>,
    pub hv16: Option<i32>,
    pub hvs01: Option<i32>,
    pub hvs59: Option<i32>,
    pub hvs03: Option<i32>,
    pub hvs04: Option<i32>,
    pub hvs02: Option<i32>,
    pub hvs48: Option<i32>,
    pub hvs49: Option<i32>,
}

/// One ER announcement, still keyed by the external hpid. The hospital
/// foreign key is resolved at write time.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnouncementRecord {
    pub hpid: String,
    pub msg_type: Option<String>,
    pub message: Option<String>,
    pub disease_type: Option<String>,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UpsertSummary {
    pub inserted: u64,
    pub updated: u64,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ReplaceSummary {
    pub deleted: u64,
    pub inserted: u64,
    pub skipped: u64,
}
