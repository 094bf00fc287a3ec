/// 입찰 검증용 상품 상태 조회
pub const GET_LISTING_STATE: &str =
    "SELECT owner_id, current_bid, is_closed FROM listings WHERE id = $1";

/// 입찰 기록 추가
pub const INSERT_BID: &str = r#"
    INSERT INTO bids (bidder_id, listing_id, amount, bid_at)
    VALUES ($1, $2, $3, $4)
    RETURNING id, bidder_id, listing_id, amount, bid_at
"#;

/// 현재 가격 갱신 (진행 중이고 더 낮은 경우만)
pub const UPDATE_CURRENT_BID: &str =
    "UPDATE listings SET current_bid = $1 WHERE id = $2 AND is_closed = 0 AND current_bid < $1";

/// 새 입찰가와 다른 입찰 기록 삭제
pub const PRUNE_BIDS: &str = "DELETE FROM bids WHERE listing_id = $1 AND amount <> $2";

/// 경매 종료
pub const CLOSE_LISTING: &str = "UPDATE listings SET is_closed = 1 WHERE id = $1";
