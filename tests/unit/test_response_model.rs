#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use safereport_api::models::{
        NewResponse, Response, ResponseFilter, ResponsePriority, ResponseStats, ResponseStatus,
        ResponseUpdate,
    };
    use uuid::Uuid;

    fn new_response(status: Option<ResponseStatus>) -> Response {
        Response::from_new(
            NewResponse {
                form_id: Uuid::new_v4(),
                data: serde_json::Map::new(),
                status,
            },
            "ABCD-EFGH-JKLM".to_string(),
            Utc::now(),
        )
    }

    #[test]
    fn test_create_defaults_to_submitted_and_stamps_timestamp() {
        let response = new_response(None);
        assert_eq!(response.status, ResponseStatus::Submitted);
        assert_eq!(response.submitted_at, Some(response.created_at));
        assert_eq!(response.priority, Some(ResponsePriority::Medium));
    }

    #[test]
    fn test_create_as_draft_leaves_submitted_at_unset() {
        let response = new_response(Some(ResponseStatus::Draft));
        assert_eq!(response.status, ResponseStatus::Draft);
        assert!(response.submitted_at.is_none());
    }

    #[test]
    fn test_update_into_submitted_stamps_once() {
        let mut response = new_response(Some(ResponseStatus::Draft));
        let t1 = response.created_at + Duration::seconds(10);
        let t2 = t1 + Duration::seconds(10);

        response.apply_update(
            ResponseUpdate {
                status: Some(ResponseStatus::Submitted),
                ..Default::default()
            },
            t1,
        );
        assert_eq!(response.submitted_at, Some(t1));

        // Idempotent re-submission through the update path
        response.apply_update(
            ResponseUpdate {
                status: Some(ResponseStatus::Submitted),
                ..Default::default()
            },
            t2,
        );
        assert_eq!(response.submitted_at, Some(t1), "submitted_at is set once");
        assert_eq!(response.updated_at, t2);
    }

    #[test]
    fn test_submit_operation_overwrites_timestamp_every_time() {
        let mut response = new_response(None);
        let first = response.submitted_at.unwrap();
        let t1 = first + Duration::seconds(30);
        let t2 = t1 + Duration::seconds(30);

        response.submit(t1);
        assert_eq!(response.submitted_at, Some(t1), "submit always re-stamps");

        response.submit(t2);
        assert_eq!(response.submitted_at, Some(t2));
        assert_eq!(response.status, ResponseStatus::Submitted);
    }

    #[test]
    fn test_review_restamps_on_every_transition() {
        let mut response = new_response(None);
        let t1 = response.created_at + Duration::seconds(60);
        let t2 = t1 + Duration::seconds(60);

        response.apply_update(
            ResponseUpdate {
                status: Some(ResponseStatus::Reviewed),
                ..Default::default()
            },
            t1,
        );
        let first = response.reviewed_at.unwrap();
        assert_eq!(first, t1);

        response.apply_update(
            ResponseUpdate {
                status: Some(ResponseStatus::Reviewed),
                ..Default::default()
            },
            t2,
        );
        let second = response.reviewed_at.unwrap();
        assert_eq!(second, t2);
        assert!(second > first, "re-review bumps the timestamp");
    }

    #[test]
    fn test_empty_update_is_a_no_op() {
        let mut response = new_response(None);
        let before = response.clone();
        response.apply_update(ResponseUpdate::default(), before.updated_at + Duration::hours(1));
        assert_eq!(response.updated_at, before.updated_at);
        assert_eq!(response.status, before.status);
    }

    #[test]
    fn test_fields_update_independently_of_status() {
        let mut response = new_response(None);
        let t1 = response.created_at + Duration::seconds(5);

        response.apply_update(
            ResponseUpdate {
                notes: Some("escalated to safeguarding lead".to_string()),
                tags: Some(vec!["urgent-review".to_string()]),
                priority: Some(ResponsePriority::High),
                ..Default::default()
            },
            t1,
        );

        assert_eq!(response.status, ResponseStatus::Submitted, "status untouched");
        assert_eq!(response.priority, Some(ResponsePriority::High));
        assert_eq!(response.tags.as_deref(), Some(&["urgent-review".to_string()][..]));
        assert_eq!(response.updated_at, t1);
    }

    #[test]
    fn test_filter_matches_status_and_priority() {
        let response = new_response(None);
        let hit = ResponseFilter {
            status: Some(ResponseStatus::Submitted),
            ..Default::default()
        };
        let miss = ResponseFilter {
            status: Some(ResponseStatus::Closed),
            ..Default::default()
        };
        assert!(hit.matches(&response));
        assert!(!miss.matches(&response));
    }

    #[test]
    fn test_filter_search_is_case_insensitive() {
        let mut response = new_response(None);
        response.notes = Some("Reported near the Main Hall".to_string());

        let by_notes = ResponseFilter {
            search: Some("main hall".to_string()),
            ..Default::default()
        };
        let by_code = ResponseFilter {
            search: Some("abcd-ef".to_string()),
            ..Default::default()
        };
        let miss = ResponseFilter {
            search: Some("cafeteria".to_string()),
            ..Default::default()
        };
        assert!(by_notes.matches(&response));
        assert!(by_code.matches(&response));
        assert!(!miss.matches(&response));
    }

    #[test]
    fn test_stats_record() {
        let mut stats = ResponseStats::default();
        stats.record(ResponseStatus::Submitted, Some(ResponsePriority::Medium));
        stats.record(ResponseStatus::Submitted, Some(ResponsePriority::High));
        stats.record(ResponseStatus::Reviewed, None);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_status["submitted"], 2);
        assert_eq!(stats.by_status["reviewed"], 1);
        assert_eq!(stats.by_priority["medium"], 1);
        assert_eq!(stats.by_priority["high"], 1);
        assert!(!stats.by_priority.contains_key("urgent"));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(ResponseStatus::Reviewed).unwrap(),
            "reviewed"
        );
        assert_eq!(
            serde_json::to_value(ResponsePriority::Urgent).unwrap(),
            "urgent"
        );
        let parsed: ResponseStatus = serde_json::from_str("\"closed\"").unwrap();
        assert_eq!(parsed, ResponseStatus::Closed);
    }
}
