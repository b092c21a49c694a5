//! One-shot topic provisioning

use tracing::{info, warn};

use crate::admin::AdminClientFactory;
use crate::error::EnvironmentResult;
use crate::park::{BrokerTopologyStatus, ServerPark};
use crate::traits::NewTopic;

/// Creates the requested topics once the brokers are running
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicProvisioner {
    topics: Vec<String>,
    provisioned: bool,
}

impl TopicProvisioner {
    pub fn new(topics: Vec<String>) -> Self {
        Self {
            topics,
            provisioned: false,
        }
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn is_provisioned(&self) -> bool {
        self.provisioned
    }

    /// Topic requests for a topology of `broker_count` brokers
    ///
    /// Every topic gets one partition per broker and is replicated on all
    /// brokers.
    pub fn requests(&self, broker_count: usize) -> Vec<NewTopic> {
        self.topics
            .iter()
            .map(|name| NewTopic::new(name.clone(), broker_count as i32, broker_count as i16))
            .collect()
    }

    /// Create all topics in one batch, at most once per provisioner
    ///
    /// Does nothing when already provisioned, when no topics were requested,
    /// or when the park has no started brokers. A client that fails to close
    /// after a successful create is only logged.
    pub async fn provision(&mut self, park: &ServerPark, admin: &AdminClientFactory) -> EnvironmentResult<()> {
        if self.provisioned || self.topics.is_empty() {
            return Ok(());
        }

        let broker_count = match &park.broker_status {
            BrokerTopologyStatus::Available { brokers, .. } => brokers.len(),
            BrokerTopologyStatus::NotAvailable => return Ok(()),
        };

        let client = match admin.create(park).await? {
            Some(client) => client,
            None => return Ok(()),
        };

        let created = client.create_topics(self.requests(broker_count)).await;
        let closed = client.close().await;
        created?;

        self.provisioned = true;
        info!(
            "📋 Created topics [{}] with {} partition(s), replication factor {}",
            self.topics.join(", "),
            broker_count,
            broker_count
        );

        if let Err(e) = closed {
            warn!("⚠️ Admin client did not close cleanly: {}", e);
        }
        Ok(())
    }
}
