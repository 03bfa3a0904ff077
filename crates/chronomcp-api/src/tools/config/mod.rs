// Code generated by `cargo xtask generate-tools`. DO NOT EDIT.

//! Read and list tools for configuration entities

pub mod bucket;
pub mod classic_dashboard;
pub mod collection;
pub mod dashboard;
pub mod drop_rule;
pub mod mapping_rule;
pub mod monitor;
pub mod muting_rule;
pub mod notification_policy;
pub mod notifier;
pub mod recording_rule;
pub mod rollup_rule;
pub mod s_l_o;
pub mod service;
pub mod team;

use chronomcp_client::ApiClient;

use crate::mcp::ToolGroup;

/// One group per configuration entity.
pub fn groups(client: &ApiClient) -> Vec<Box<dyn ToolGroup>> {
    vec![
        Box::new(bucket::BucketTools::new(client.clone())),
        Box::new(collection::CollectionTools::new(client.clone())),
        Box::new(dashboard::DashboardTools::new(client.clone())),
        Box::new(classic_dashboard::ClassicDashboardTools::new(client.clone())),
        Box::new(drop_rule::DropRuleTools::new(client.clone())),
        Box::new(mapping_rule::MappingRuleTools::new(client.clone())),
        Box::new(monitor::MonitorTools::new(client.clone())),
        Box::new(muting_rule::MutingRuleTools::new(client.clone())),
        Box::new(notification_policy::NotificationPolicyTools::new(client.clone())),
        Box::new(notifier::NotifierTools::new(client.clone())),
        Box::new(recording_rule::RecordingRuleTools::new(client.clone())),
        Box::new(rollup_rule::RollupRuleTools::new(client.clone())),
        Box::new(service::ServiceTools::new(client.clone())),
        Box::new(s_l_o::SLOTools::new(client.clone())),
        Box::new(team::TeamTools::new(client.clone())),
    ]
}
