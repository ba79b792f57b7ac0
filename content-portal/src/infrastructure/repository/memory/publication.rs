use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use domain_publication::{
    model::entity::{
        AuditRecord, HierarchyField, HierarchyFieldValue, PublicationRequest, ReductionTask,
        RootContentItem, SelectionGroup,
    },
    repository::{
        AuditRecordRepo, HierarchyRepo, PublicationRequestRepo, ReductionTaskRepo,
        RootContentItemRepo, SelectionGroupRepo,
    },
};
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryRootContentItemRepo {
    items: DashMap<Uuid, RootContentItem>,
}

#[async_trait]
impl RootContentItemRepo for InMemoryRootContentItemRepo {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<RootContentItem>> {
        Ok(self.items.get(&id).map(|i| i.clone()))
    }

    async fn insert(&self, item: &RootContentItem) -> anyhow::Result<()> {
        self.items.insert(item.id, item.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemorySelectionGroupRepo {
    groups: DashMap<Uuid, SelectionGroup>,
}

#[async_trait]
impl SelectionGroupRepo for InMemorySelectionGroupRepo {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<SelectionGroup>> {
        Ok(self.groups.get(&id).map(|g| g.clone()))
    }

    async fn get_all_by_root_item(
        &self,
        root_content_item_id: Uuid,
    ) -> anyhow::Result<Vec<SelectionGroup>> {
        let mut groups: Vec<_> = self
            .groups
            .iter()
            .filter(|g| g.root_content_item_id == root_content_item_id)
            .map(|g| g.clone())
            .collect();
        groups.sort_by(|a, b| a.group_name.cmp(&b.group_name));
        Ok(groups)
    }

    async fn insert(&self, group: &SelectionGroup) -> anyhow::Result<()> {
        self.groups.insert(group.id, group.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryHierarchyRepo {
    fields: DashMap<Uuid, HierarchyField>,
    values: DashMap<Uuid, HierarchyFieldValue>,
}

#[async_trait]
impl HierarchyRepo for InMemoryHierarchyRepo {
    async fn get_field(&self, field_id: Uuid) -> anyhow::Result<Option<HierarchyField>> {
        Ok(self.fields.get(&field_id).map(|f| f.clone()))
    }

    async fn get_values_by_ids(&self, ids: &[Uuid]) -> anyhow::Result<Vec<HierarchyFieldValue>> {
        Ok(ids.iter().filter_map(|id| self.values.get(id).map(|v| v.clone())).collect())
    }

    async fn insert_field(&self, field: &HierarchyField) -> anyhow::Result<()> {
        self.fields.insert(field.id, field.clone());
        Ok(())
    }

    async fn insert_value(&self, value: &HierarchyFieldValue) -> anyhow::Result<()> {
        self.values.insert(value.id, value.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryPublicationRequestRepo {
    requests: DashMap<Uuid, PublicationRequest>,
    /// root content item id -> the request currently holding Processing.
    processing: DashMap<Uuid, Uuid>,
}

#[async_trait]
impl PublicationRequestRepo for InMemoryPublicationRequestRepo {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<PublicationRequest>> {
        Ok(self.requests.get(&id).map(|r| r.clone()))
    }

    async fn claim_processing(
        &self,
        request: &PublicationRequest,
    ) -> anyhow::Result<Option<Uuid>> {
        // Entry holds the shard lock across check and insert, making the
        // claim atomic the way the catalog would with a transaction.
        match self.processing.entry(request.root_content_item_id) {
            Entry::Occupied(holder) => Ok(Some(*holder.get())),
            Entry::Vacant(slot) => {
                slot.insert(request.id);
                self.requests.insert(request.id, request.clone());
                Ok(None)
            }
        }
    }

    async fn release_processing(
        &self,
        root_content_item_id: Uuid,
        request_id: Uuid,
    ) -> anyhow::Result<()> {
        self.processing
            .remove_if(&root_content_item_id, |_, holder| *holder == request_id);
        Ok(())
    }

    async fn update(&self, request: &PublicationRequest) -> anyhow::Result<()> {
        self.requests.insert(request.id, request.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryReductionTaskRepo {
    tasks: DashMap<Uuid, ReductionTask>,
}

#[async_trait]
impl ReductionTaskRepo for InMemoryReductionTaskRepo {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<ReductionTask>> {
        Ok(self.tasks.get(&id).map(|t| t.clone()))
    }

    async fn get_by_request(
        &self,
        publication_request_id: Uuid,
    ) -> anyhow::Result<Vec<ReductionTask>> {
        let mut tasks: Vec<_> = self
            .tasks
            .iter()
            .filter(|t| t.publication_request_id == publication_request_id)
            .map(|t| t.clone())
            .collect();
        tasks.sort_by_key(|t| (t.created_at_utc, t.id));
        Ok(tasks)
    }

    async fn insert_many(&self, tasks: &[ReductionTask]) -> anyhow::Result<()> {
        for task in tasks {
            self.tasks.insert(task.id, task.clone());
        }
        Ok(())
    }

    async fn update(&self, task: &ReductionTask) -> anyhow::Result<()> {
        self.tasks.insert(task.id, task.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryAuditRecordRepo {
    records: DashMap<Uuid, AuditRecord>,
}

#[async_trait]
impl AuditRecordRepo for InMemoryAuditRecordRepo {
    async fn insert(&self, record: &AuditRecord) -> anyhow::Result<()> {
        self.records.insert(record.id, record.clone());
        Ok(())
    }

    async fn get_by_request(
        &self,
        publication_request_id: Uuid,
    ) -> anyhow::Result<Vec<AuditRecord>> {
        let mut records: Vec<_> = self
            .records
            .iter()
            .filter(|r| r.publication_request_id == publication_request_id)
            .map(|r| r.clone())
            .collect();
        records.sort_by_key(|r| (r.created_at_utc, r.id));
        Ok(records)
    }
}
