pub mod response;

/// Top-level region filter. The poller covers metropolitan Seoul only.
pub const SEOUL: &str = "서울특별시";

/// The 25 autonomous districts of Seoul, polled in this order.
pub const DISTRICTS: [&str; 25] = [
    "강남구",
    "강동구",
    "강북구",
    "강서구",
    "관악구",
    "광진구",
    "구로구",
    "금천구",
    "노원구",
    "도봉구",
    "동대문구",
    "동작구",
    "마포구",
    "서대문구",
    "서초구",
    "성동구",
    "성북구",
    "송파구",
    "양천구",
    "영등포구",
    "용산구",
    "은평구",
    "종로구",
    "중구",
    "중랑구",
];

/// `resultCode` value the API sends on success.
pub const RESULT_CODE_SUCCESS: &str = "00";
