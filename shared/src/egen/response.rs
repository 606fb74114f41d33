use serde::Deserialize;

/// Common E-Gen response envelope. Both endpoints wrap their payload in the
/// same header/body structure and differ only in the item element, so the
/// envelope is generic over it.
///
/// Every field the poller does not name is ignored by the deserializer; the
/// API sends far more tags per item than the snapshot tables keep.
#[derive(Debug, Deserialize)]
pub struct ResponseEnvelope<T> {
    pub header: ResponseHeader,
    #[serde(default)]
    pub body: Option<ResponseBody<T>>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseHeader {
    #[serde(rename = "resultCode")]
    pub result_code: String,
    #[serde(rename = "resultMsg", default)]
    pub result_msg: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseBody<T> {
    #[serde(default)]
    pub items: Option<ItemList<T>>,
    #[serde(rename = "numOfRows", default)]
    pub num_of_rows: Option<u32>,
    #[serde(rename = "pageNo", default)]
    pub page_no: Option<u32>,
    #[serde(rename = "totalCount", default)]
    pub total_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ItemList<T> {
    #[serde(default)]
    pub item: Vec<T>,
}

/// One hospital's realtime resource readings. Everything arrives as element
/// text; a dropped tag deserializes to `None` and the downstream projections
/// decide what that means per field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RealtimeItem {
    pub hpid: Option<String>,

    // Equipment availability flags ("Y" / "N1").
    pub hvventiayn: Option<String>,
    pub hvventisoayn: Option<String>,
    pub hvincuayn: Option<String>,
    pub hvcrrtayn: Option<String>,
    pub hvecmoayn: Option<String>,
    pub hvhypoayn: Option<String>,
    pub hvoxyayn: Option<String>,
    pub hvctayn: Option<String>,
    pub hvmriayn: Option<String>,
    pub hvangioayn: Option<String>,

    // Equipment unit counts.
    pub hvs30: Option<String>,
    pub hvs31: Option<String>,
    pub hvs32: Option<String>,
    pub hvs33: Option<String>,
    pub hvs34: Option<String>,
    pub hvs35: Option<String>,
    pub hvs37: Option<String>,
    pub hvs27: Option<String>,
    pub hvs28: Option<String>,
    pub hvs29: Option<String>,

    // ICU bed counts.
    pub hvcc: Option<String>,
    pub hvncc: Option<String>,
    pub hvccc: Option<String>,
    pub hvicc: Option<String>,
    pub hv2: Option<String>,
    pub hv3: Option<String>,
    pub hv6: Option<String>,
    pub hv8: Option<String>,
    pub hv9: Option<String>,
    pub hv32: Option<String>,
    pub hv34: Option<String>,
    pub hv35: Option<String>,
    pub hvs11: Option<String>,
    pub hvs08: Option<String>,
    pub hvs16: Option<String>,
    pub hvs17: Option<String>,
    pub hvs06: Option<String>,
    pub hvs07: Option<String>,
    pub hvs12: Option<String>,
    pub hvs13: Option<String>,
    pub hvs14: Option<String>,
    pub hvs09: Option<String>,
    pub hvs15: Option<String>,
    pub hvs18: Option<String>,

    // Emergency room counts.
    pub hvec: Option<String>,
    pub hv27: Option<String>,
    pub hv29: Option<String>,
    pub hv30: Option<String>,
    pub hv28: Option<String>,
    pub hv15: Option<String>,
    pub hv16: Option<String>,
    pub hvs01: Option<String>,
    pub hvs59: Option<String>,
    pub hvs03: Option<String>,
    pub hvs04: Option<String>,
    pub hvs02: Option<String>,
    pub hvs48: Option<String>,
    pub hvs49: Option<String>,
}

/// One ER announcement (severe-illness message) for a hospital.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnnouncementItem {
    pub hpid: Option<String>,
    #[serde(rename = "symBlkMsgTyp")]
    pub sym_blk_msg_typ: Option<String>,
    #[serde(rename = "symBlkMsg")]
    pub sym_blk_msg: Option<String>,
    #[serde(rename = "symTypCod")]
    pub sym_typ_cod: Option<String>,
    #[serde(rename = "symBlkSttDtm")]
    pub sym_blk_stt_dtm: Option<String>,
    #[serde(rename = "symBlkEndDtm")]
    pub sym_blk_end_dtm: Option<String>,
}
