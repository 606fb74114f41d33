use crate::database::models::{
    AnnouncementRecord, EmergencyRecord, EquipmentRecord, IcuRecord,
};
use crate::error::ParseError;
use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use shared::egen::RESULT_CODE_SUCCESS;
use shared::egen::response::{AnnouncementItem, RealtimeItem, ResponseEnvelope};
use tracing::warn;

/// One decoded page of items plus the counter needed to decide whether
/// another fetch is required.
#[derive(Debug)]
pub struct ParsedPage<T> {
    pub items: Vec<T>,
    pub total_count: u32,
}

/// Decodes one envelope and gates on the API status code. A non-success code
/// fails the whole page; a present-but-empty items element is just an empty
/// page.
pub fn parse_page<T: DeserializeOwned + Default>(xml: &str) -> Result<ParsedPage<T>, ParseError> {
    let envelope: ResponseEnvelope<T> = quick_xml::de::from_str(xml)?;

    if envelope.header.result_code != RESULT_CODE_SUCCESS {
        return Err(ParseError::Api {
            code: envelope.header.result_code,
            message: envelope.header.result_msg.unwrap_or_default(),
        });
    }

    let (items, total_count) = match envelope.body {
        Some(body) => (
            body.items.map(|list| list.item).unwrap_or_default(),
            body.total_count.unwrap_or(0),
        ),
        None => (Vec::new(), 0),
    };

    Ok(ParsedPage { items, total_count })
}

/// Whether the fetch loop should request another page. An empty page stops
/// the walk regardless of what totalCount claims.
pub fn has_more_pages(fetched_in_page: usize, accumulated: usize, total_count: u32) -> bool {
    fetched_in_page > 0 && accumulated < total_count as usize
}

/// "Y" means available, "N1" means unavailable. The API emits other values
/// (or drops the tag entirely) when the state is unknown, and those must stay
/// unknown rather than collapse into false.
pub fn parse_yn_flag(raw: Option<&str>) -> Option<bool> {
    match raw {
        Some("Y") => Some(true),
        Some("N1") => Some(false),
        _ => None,
    }
}

fn parse_count(raw: Option<&str>, hpid: &str, tag: &'static str) -> Option<i32> {
    let raw = raw?;
    match raw.trim().parse() {
        Ok(count) => Some(count),
        Err(_) => {
            warn!(hpid, tag, value = raw, "non-numeric count in item");
            None
        }
    }
}

/// Announcement windows arrive as compact `YYYYMMDDHHMMSS` strings. Absent or
/// empty input is an open bound; anything else that is not exactly fourteen
/// digits of a real calendar time is a hard error.
pub fn parse_compact_datetime(
    raw: Option<&str>,
    field: &'static str,
) -> Result<Option<NaiveDateTime>, ParseError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if raw.len() != 14 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::Timestamp {
            field,
            value: raw.to_string(),
        });
    }
    NaiveDateTime::parse_from_str(raw, "%Y%m%d%H%M%S")
        .map(Some)
        .map_err(|_| ParseError::Timestamp {
            field,
            value: raw.to_string(),
        })
}

fn field<'a>(raw: &'a Option<String>, hpid: &str, tag: &'static str) -> Option<&'a str> {
    if raw.is_none() {
        warn!(hpid, tag, "field missing from item");
    }
    raw.as_deref()
}

fn require_hpid(hpid: Option<&str>) -> Option<&str> {
    match hpid {
        Some(hpid) if !hpid.is_empty() => Some(hpid),
        _ => {
            warn!("item without hpid, skipping record");
            None
        }
    }
}

/// Equipment view of a realtime item. `None` when the item carries no hpid,
/// since such a record could not key an upsert.
pub fn equipment_record(item: &RealtimeItem) -> Option<EquipmentRecord> {
    let hpid = require_hpid(item.hpid.as_deref())?;
    Some(EquipmentRecord {
        hpid: hpid.to_string(),
        hvventiayn: parse_yn_flag(field(&item.hvventiayn, hpid, "hvventiayn")),
        hvventisoayn: parse_yn_flag(field(&item.hvventisoayn, hpid, "hvventisoayn")),
        hvincuayn: parse_yn_flag(field(&item.hvincuayn, hpid, "hvincuayn")),
        hvcrrtayn: parse_yn_flag(field(&item.hvcrrtayn, hpid, "hvcrrtayn")),
        hvecmoayn: parse_yn_flag(field(&item.hvecmoayn, hpid, "hvecmoayn")),
        hvhypoayn: parse_yn_flag(field(&item.hvhypoayn, hpid, "hvhypoayn")),
        hvoxyayn: parse_yn_flag(field(&item.hvoxyayn, hpid, "hvoxyayn")),
        hvctayn: parse_yn_flag(field(&item.hvctayn, hpid, "hvctayn")),
        hvmriayn: parse_yn_flag(field(&item.hvmriayn, hpid, "hvmriayn")),
        hvangioayn: parse_yn_flag(field(&item.hvangioayn, hpid, "hvangioayn")),
        hvs30: parse_count(field(&item.hvs30, hpid, "hvs30"), hpid, "hvs30"),
        hvs31: parse_count(field(&item.hvs31, hpid, "hvs31"), hpid, "hvs31"),
        hvs32: parse_count(field(&item.hvs32, hpid, "hvs32"), hpid, "hvs32"),
        hvs33: parse_count(field(&item.hvs33, hpid, "hvs33"), hpid, "hvs33"),
        hvs34: parse_count(field(&item.hvs34, hpid, "hvs34"), hpid, "hvs34"),
        hvs35: parse_count(field(&item.hvs35, hpid, "hvs35"), hpid, "hvs35"),
        hvs37: parse_count(field(&item.hvs37, hpid, "hvs37"), hpid, "hvs37"),
        hvs27: parse_count(field(&item.hvs27, hpid, "hvs27"), hpid, "hvs27"),
        hvs28: parse_count(field(&item.hvs28, hpid, "hvs28"), hpid, "hvs28"),
        hvs29: parse_count(field(&item.hvs29, hpid, "hvs29"), hpid, "hvs29"),
    })
}

/// ICU view of a realtime item.
pub fn icu_record(item: &RealtimeItem) -> Option<IcuRecord> {
    let hpid = require_hpid(item.hpid.as_deref())?;
    Some(IcuRecord {
        hpid: hpid.to_string(),
        hvcc: parse_count(field(&item.hvcc, hpid, "hvcc"), hpid, "hvcc"),
        hvncc: parse_count(field(&item.hvncc, hpid, "hvncc"), hpid, "hvncc"),
        hvccc: parse_count(field(&item.hvccc, hpid, "hvccc"), hpid, "hvccc"),
        hvicc: parse_count(field(&item.hvicc, hpid, "hvicc"), hpid, "hvicc"),
        hv2: parse_count(field(&item.hv2, hpid, "hv2"), hpid, "hv2"),
        hv3: parse_count(field(&item.hv3, hpid, "hv3"), hpid, "hv3"),
        hv6: parse_count(field(&item.hv6, hpid, "hv6"), hpid, "hv6"),
        hv8: parse_count(field(&item.hv8, hpid, "hv8"), hpid, "hv8"),
        hv9: parse_count(field(&item.hv9, hpid, "hv9"), hpid, "hv9"),
        hv32: parse_count(field(&item.hv32, hpid, "hv32"), hpid, "hv32"),
        hv34: parse_count(field(&item.hv34, hpid, "hv34"), hpid, "hv34"),
        hv35: parse_count(field(&item.hv35, hpid, "hv35"), hpid, "hv35"),
        hvs11: parse_count(field(&item.hvs11, hpid, "hvs11"), hpid, "hvs11"),
        hvs08: parse_count(field(&item.hvs08, hpid, "hvs08"), hpid, "hvs08"),
        hvs16: parse_count(field(&item.hvs16, hpid, "hvs16"), hpid, "hvs16"),
        hvs17: parse_count(field(&item.hvs17, hpid, "hvs17"), hpid, "hvs17"),
        hvs06: parse_count(field(&item.hvs06, hpid, "hvs06"), hpid, "hvs06"),
        hvs07: parse_count(field(&item.hvs07, hpid, "hvs07"), hpid, "hvs07"),
        hvs12: parse_count(field(&item.hvs12, hpid, "hvs12"), hpid, "hvs12"),
        hvs13: parse_count(field(&item.hvs13, hpid, "hvs13"), hpid, "hvs13"),
        hvs14: parse_count(field(&item.hvs14, hpid, "hvs14"), hpid, "hvs14"),
        hvs09: parse_count(field(&item.hvs09, hpid, "hvs09"), hpid, "hvs09"),
        hvs15: parse_count(field(&item.hvs15, hpid, "hvs15"), hpid, "hvs15"),
        hvs18: parse_count(field(&item.hvs18, hpid, "hvs18"), hpid, "hvs18"),
    })
}

/// Emergency room view of a realtime item.
pub fn emergency_record(item: &RealtimeItem) -> Option<EmergencyRecord> {
    let hpid = require_hpid(item.hpid.as_deref())?;
    Some(EmergencyRecord {
        hpid: hpid.to_string(),
        hvec: parse_count(field(&item.hvec, hpid, "hvec"), hpid, "hvec"),
        hv27: parse_count(field(&item.hv27, hpid, "hv27"), hpid, "hv27"),
        hv29: parse_count(field(&item.hv29, hpid, "hv29"), hpid, "hv29"),
        hv30: parse_count(field(&item.hv30, hpid, "hv30"), hpid, "hv30"),
        hv28: parse_count(field(&item.hv28, hpid, "hv28"), hpid, "hv28"),
        hv15: parse_count(field(&item.hv15, hpid, "hv15"), hpid, "hv15"),
        hv16: parse_count(field(&item.hv16, hpid, "hv16"), hpid, "hv16"),
        hvs01: parse_count(field(&item.hvs01, hpid, "hvs01"), hpid, "hvs01"),
        hvs59: parse_count(field(&item.hvs59, hpid, "hvs59"), hpid, "hvs59"),
        hvs03: parse_count(field(&item.hvs03, hpid, "hvs03"), hpid, "hvs03"),
        hvs04: parse_count(field(&item.hvs04, hpid, "hvs04"), hpid, "hvs04"),
        hvs02: parse_count(field(&item.hvs02, hpid, "hvs02"), hpid, "hvs02"),
        hvs48: parse_count(field(&item.hvs48, hpid, "hvs48"), hpid, "hvs48"),
        hvs49: parse_count(field(&item.hvs49, hpid, "hvs49"), hpid, "hvs49"),
    })
}

/// Announcement record for one item. `Ok(None)` skips a record without an
/// hpid; a malformed block window timestamp fails the whole batch for the
/// district.
pub fn announcement_record(
    item: &AnnouncementItem,
) -> Result<Option<AnnouncementRecord>, ParseError> {
    let Some(hpid) = require_hpid(item.hpid.as_deref()) else {
        return Ok(None);
    };
    Ok(Some(AnnouncementRecord {
        hpid: hpid.to_string(),
        msg_type: field(&item.sym_blk_msg_typ, hpid, "symBlkMsgTyp").map(str::to_string),
        message: field(&item.sym_blk_msg, hpid, "symBlkMsg").map(str::to_string),
        disease_type: field(&item.sym_typ_cod, hpid, "symTypCod").map(str::to_string),
        start_time: parse_compact_datetime(
            field(&item.sym_blk_stt_dtm, hpid, "symBlkSttDtm"),
            "symBlkSttDtm",
        )?,
        end_time: parse_compact_datetime(
            field(&item.sym_blk_end_dtm, hpid, "symBlkEndDtm"),
            "symBlkEndDtm",
        )?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const REALTIME_SAMPLE: &str = r#"
    <response>
        <header>
            <resultCode>00</resultCode>
            <resultMsg>NORMAL SERVICE.</resultMsg>
        </header>
        <body>
            <items>
                <item>
                    <hpid>A1100001</hpid>
                    <dutyName>Some Hospital</dutyName>
                    <hvincuayn>Y</hvincuayn>
                    <hvventiayn>N1</hvventiayn>
                    <hvoxyayn>N2</hvoxyayn>
                    <hvec>12</hvec>
                    <hvcc>3</hvcc>
                    <hvs30>5</hvs30>
                </item>
                <item>
                    <hpid>A1100002</hpid>
                    <hvec>0</hvec>
                </item>
            </items>
            <numOfRows>10</numOfRows>
            <pageNo>1</pageNo>
            <totalCount>2</totalCount>
        </body>
    </response>
    "#;

    const ERROR_SAMPLE: &str = r#"
    <response>
        <header>
            <resultCode>22</resultCode>
            <resultMsg>LIMITED NUMBER OF SERVICE REQUESTS EXCEEDS</resultMsg>
        </header>
    </response>
    "#;

    const EMPTY_SAMPLE: &str = r#"
    <response>
        <header>
            <resultCode>00</resultCode>
            <resultMsg>NORMAL SERVICE.</resultMsg>
        </header>
        <body>
            <items/>
            <numOfRows>10</numOfRows>
            <pageNo>1</pageNo>
            <totalCount>0</totalCount>
        </body>
    </response>
    "#;

    #[test]
    fn yn_flag_mapping_is_exact() {
        assert_eq!(parse_yn_flag(Some("Y")), Some(true));
        assert_eq!(parse_yn_flag(Some("N1")), Some(false));
        assert_eq!(parse_yn_flag(Some("N")), None);
        assert_eq!(parse_yn_flag(Some("N2")), None);
        assert_eq!(parse_yn_flag(Some("")), None);
        assert_eq!(parse_yn_flag(None), None);
    }

    #[test]
    fn compact_datetime_roundtrips() {
        let parsed = parse_compact_datetime(Some("20250301143000"), "symBlkSttDtm")
            .unwrap()
            .unwrap();
        assert_eq!(
            parsed,
            NaiveDate::from_ymd_opt(2025, 3, 1)
                .unwrap()
                .and_hms_opt(14, 30, 0)
                .unwrap()
        );
    }

    #[test]
    fn compact_datetime_absent_is_none() {
        assert_eq!(parse_compact_datetime(None, "symBlkSttDtm").unwrap(), None);
        assert_eq!(
            parse_compact_datetime(Some(""), "symBlkSttDtm").unwrap(),
            None
        );
        assert_eq!(
            parse_compact_datetime(Some("   "), "symBlkSttDtm").unwrap(),
            None
        );
    }

    #[test]
    fn compact_datetime_rejects_malformed_input() {
        assert!(parse_compact_datetime(Some("2025030114300"), "symBlkSttDtm").is_err());
        assert!(parse_compact_datetime(Some("202503011430000"), "symBlkSttDtm").is_err());
        assert!(parse_compact_datetime(Some("2025-03-01T14:3"), "symBlkSttDtm").is_err());
        // Fourteen digits but not a real calendar time.
        assert!(parse_compact_datetime(Some("20251301143000"), "symBlkSttDtm").is_err());
    }

    #[test]
    fn parse_page_decodes_items_and_total() {
        let page = parse_page::<RealtimeItem>(REALTIME_SAMPLE).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_count, 2);
        assert_eq!(page.items[0].hpid.as_deref(), Some("A1100001"));
        assert_eq!(page.items[0].hvincuayn.as_deref(), Some("Y"));
        // Tag absent from the payload entirely.
        assert_eq!(page.items[0].hvecmoayn, None);
    }

    #[test]
    fn parse_page_fails_on_api_error_code() {
        let err = parse_page::<RealtimeItem>(ERROR_SAMPLE).unwrap_err();
        match err {
            ParseError::Api { code, message } => {
                assert_eq!(code, "22");
                assert!(message.contains("LIMITED"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn parse_page_treats_empty_items_as_empty_page() {
        let page = parse_page::<RealtimeItem>(EMPTY_SAMPLE).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 0);
    }

    #[test]
    fn equipment_projection_keeps_unknowns_null() {
        let page = parse_page::<RealtimeItem>(REALTIME_SAMPLE).unwrap();
        let record = equipment_record(&page.items[0]).unwrap();
        assert_eq!(record.hpid, "A1100001");
        assert_eq!(record.hvincuayn, Some(true));
        assert_eq!(record.hvventiayn, Some(false));
        // "N2" is neither sentinel, so the flag is unknown.
        assert_eq!(record.hvoxyayn, None);
        // Tag missing from the item.
        assert_eq!(record.hvecmoayn, None);
        assert_eq!(record.hvs30, Some(5));
        assert_eq!(record.hvs31, None);
    }

    #[test]
    fn icu_and_emergency_projections_share_the_payload() {
        let page = parse_page::<RealtimeItem>(REALTIME_SAMPLE).unwrap();
        let icu = icu_record(&page.items[0]).unwrap();
        let emergency = emergency_record(&page.items[0]).unwrap();
        assert_eq!(icu.hpid, "A1100001");
        assert_eq!(icu.hvcc, Some(3));
        assert_eq!(icu.hvncc, None);
        assert_eq!(emergency.hpid, "A1100001");
        assert_eq!(emergency.hvec, Some(12));
        assert_eq!(emergency.hv27, None);
    }

    #[test]
    fn records_without_hpid_are_skipped() {
        let item = RealtimeItem {
            hvec: Some("4".to_string()),
            ..RealtimeItem::default()
        };
        assert!(equipment_record(&item).is_none());
        assert!(icu_record(&item).is_none());
        assert!(emergency_record(&item).is_none());

        let announcement = AnnouncementItem {
            sym_blk_msg: Some("ER closed".to_string()),
            ..AnnouncementItem::default()
        };
        assert!(announcement_record(&announcement).unwrap().is_none());
    }

    #[test]
    fn announcement_projection_parses_block_window() {
        let item = AnnouncementItem {
            hpid: Some("A1100001".to_string()),
            sym_blk_msg_typ: Some("응급".to_string()),
            sym_blk_msg: Some("중증외상 수용 불가".to_string()),
            sym_typ_cod: Some("Y0010".to_string()),
            sym_blk_stt_dtm: Some("20250301090000".to_string()),
            sym_blk_end_dtm: None,
        };
        let record = announcement_record(&item).unwrap().unwrap();
        assert_eq!(record.hpid, "A1100001");
        assert_eq!(record.msg_type.as_deref(), Some("응급"));
        assert_eq!(record.disease_type.as_deref(), Some("Y0010"));
        assert!(record.start_time.is_some());
        assert_eq!(record.end_time, None);
    }

    #[test]
    fn announcement_projection_fails_on_malformed_window() {
        let item = AnnouncementItem {
            hpid: Some("A1100001".to_string()),
            sym_blk_stt_dtm: Some("2025-03-01".to_string()),
            ..AnnouncementItem::default()
        };
        assert!(announcement_record(&item).is_err());
    }

    #[test]
    fn page_walk_stops_at_total_or_empty_page() {
        assert!(has_more_pages(10, 10, 21));
        assert!(has_more_pages(10, 20, 21));
        assert!(!has_more_pages(1, 21, 21));
        assert!(!has_more_pages(10, 10, 10));
        // A lying totalCount must not loop forever on empty pages.
        assert!(!has_more_pages(0, 0, 5));
    }
}
