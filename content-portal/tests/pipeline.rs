//! End-to-end pipeline tests over real services, in-memory catalog repos
//! and per-test scratch directories.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use content_portal::infrastructure::{config::PortalConfig, ServiceProvider};
use domain_publication::{
    exception::PublicationException,
    model::{
        entity::{
            ContentKind, HierarchyField, HierarchyFieldValue, PublicationStatus,
            ReductionTaskStatus, RootContentItem, SelectionGroup,
        },
        vo::{PublicationStatusView, RelatedFile, RelatedFileKind},
    },
};
use domain_transfer::{
    command::FinalizeUploadCommand,
    model::{
        entity::UploadStatus,
        vo::{HashAlgorithm, ResumableInfo, UploadUid},
    },
};
use infrastructure_queue::MessageQueueProducerTemplate;
use uuid::Uuid;

const CHUNK_SIZE: u64 = 1024;

fn test_config() -> PortalConfig {
    let base = std::env::temp_dir().join(format!("portal-test-{}", Uuid::new_v4()));
    let mut config = PortalConfig::default();
    config.storage.scratch_dir = base.join("scratch");
    config.storage.artifact_dir = base.join("artifacts");
    config.storage.reduced_dir = base.join("reduced");
    config.storage.serving_dir = base.join("serving");
    config
}

fn provider() -> Arc<ServiceProvider> {
    Arc::new(ServiceProvider::build(test_config()).unwrap())
}

fn provider_with_workers() -> Arc<ServiceProvider> {
    let sp = provider();
    for service in sp.clone().background_services() {
        tokio::spawn(async move { service.run().await });
    }
    sp
}

fn info_for(file_name: &str, content: &[u8]) -> ResumableInfo {
    let checksum = blake3::hash(content).to_string().to_uppercase();
    ResumableInfo {
        uid: UploadUid::derive(file_name, &checksum),
        file_name: file_name.to_string(),
        checksum,
        hash_algorithm: HashAlgorithm::Blake3,
        total_size: content.len() as u64,
        chunk_size: CHUNK_SIZE,
        total_chunks: (content.len() as u64 + CHUNK_SIZE - 1) / CHUNK_SIZE,
    }
}

fn chunk(content: &[u8], nth: u64) -> Vec<u8> {
    let start = (nth * CHUNK_SIZE) as usize;
    let end = content.len().min(start + CHUNK_SIZE as usize);
    content[start..end].to_vec()
}

async fn wait_upload_status(sp: &ServiceProvider, uid: &UploadUid, expected: UploadStatus) {
    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            let upload = sp.chunk_store.upload_status(uid).await.unwrap();
            if upload.status == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("upload {uid} never reached {expected}"))
}

/// Chunks the content, finalizes through the queue, waits for `Complete`.
async fn upload_file(sp: &Arc<ServiceProvider>, file_name: &str, content: &[u8]) -> ResumableInfo {
    let info = info_for(file_name, content);
    for nth in 0..info.total_chunks {
        sp.chunk_store.write_chunk(&info, nth, chunk(content, nth)).await.unwrap();
    }
    sp.queue_router
        .send_object(
            &FinalizeUploadCommand {
                uid: info.uid.clone(),
            },
            &sp.config.internal_topics.finalize,
        )
        .await
        .unwrap();
    wait_upload_status(sp, &info.uid, UploadStatus::Complete).await;
    info
}

fn master_related(info: &ResumableInfo) -> RelatedFile {
    RelatedFile {
        upload_uid: info.uid.clone(),
        file_name: info.file_name.clone(),
        kind: RelatedFileKind::Master,
    }
}

async fn wait_request_terminal(sp: &ServiceProvider, request_id: Uuid) -> PublicationStatusView {
    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            let view = sp.publication_service.status_view(request_id).await.unwrap();
            if matches!(
                view.status,
                PublicationStatus::Confirmed | PublicationStatus::Failed
            ) {
                return view;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("request {request_id} never reached a terminal status"))
}

/// A request can turn `Failed` while sibling tasks still run; wait until
/// every task settled too before inspecting the serving tree.
async fn wait_tasks_terminal(sp: &ServiceProvider, request_id: Uuid) -> PublicationStatusView {
    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            let view = sp.publication_service.status_view(request_id).await.unwrap();
            let request_terminal = matches!(
                view.status,
                PublicationStatus::Confirmed | PublicationStatus::Failed
            );
            let tasks_terminal = view.selection_groups.iter().all(|g| {
                matches!(
                    g.status,
                    ReductionTaskStatus::Replaced | ReductionTaskStatus::Failed
                )
            });
            if request_terminal && tasks_terminal {
                return view;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("request {request_id} never fully settled"))
}

fn group_live_path(sp: &ServiceProvider, item_id: Uuid, group_id: Uuid) -> PathBuf {
    sp.config
        .storage
        .serving_dir
        .join(item_id.to_string())
        .join("groups")
        .join(group_id.to_string())
}

#[tokio::test]
async fn resumable_three_chunk_upload_assembles_the_exact_bytes() {
    let sp = provider_with_workers();
    let content: Vec<u8> = (0..2560u32).map(|n| (n % 251) as u8).collect();
    let info = info_for("weekly-report.qvw", &content);

    let missing = sp.chunk_store.write_chunk(&info, 0, chunk(&content, 0)).await.unwrap();
    assert_eq!(missing, vec![1, 2]);
    assert_eq!(
        sp.chunk_store.missing_chunks(&info.uid).await.unwrap(),
        vec![1, 2]
    );

    // Retry of an already acknowledged chunk changes nothing.
    let missing = sp.chunk_store.write_chunk(&info, 0, chunk(&content, 0)).await.unwrap();
    assert_eq!(missing, vec![1, 2]);

    sp.chunk_store.write_chunk(&info, 1, chunk(&content, 1)).await.unwrap();
    let missing = sp.chunk_store.write_chunk(&info, 2, chunk(&content, 2)).await.unwrap();
    assert!(missing.is_empty());
    assert!(sp.chunk_store.missing_chunks(&info.uid).await.unwrap().is_empty());

    sp.queue_router
        .send_object(
            &FinalizeUploadCommand {
                uid: info.uid.clone(),
            },
            &sp.config.internal_topics.finalize,
        )
        .await
        .unwrap();
    wait_upload_status(&sp, &info.uid, UploadStatus::Complete).await;

    assert_eq!(sp.artifact_store.read(&info.checksum).await.unwrap(), content);
}

#[tokio::test]
async fn wrong_declared_checksum_ends_in_error_and_stores_nothing() {
    let sp = provider_with_workers();
    let content = vec![7u8; 1500];
    let mut info = info_for("broken.qvw", &content);
    info.checksum = "DEADBEEF".to_string();
    info.uid = UploadUid::derive(&info.file_name, &info.checksum);

    for nth in 0..info.total_chunks {
        sp.chunk_store.write_chunk(&info, nth, chunk(&content, nth)).await.unwrap();
    }
    sp.queue_router
        .send_object(
            &FinalizeUploadCommand {
                uid: info.uid.clone(),
            },
            &sp.config.internal_topics.finalize,
        )
        .await
        .unwrap();
    wait_upload_status(&sp, &info.uid, UploadStatus::Error).await;

    let upload = sp.chunk_store.upload_status(&info.uid).await.unwrap();
    assert!(upload.error_message.unwrap().contains("hash not match"));
    assert!(!sp.artifact_store.exists(&info.checksum).await.unwrap());
    // Scratch chunks survive, so the client may re-send the bad ones.
    assert_eq!(
        sp.chunk_store.missing_chunks(&info.uid).await.unwrap(),
        Vec::<u64>::new()
    );
}

#[tokio::test]
async fn identical_bytes_under_a_new_name_flash_complete_without_transfer() {
    let sp = provider_with_workers();
    let content = vec![42u8; 3000];
    let first = upload_file(&sp, "original.qvw", &content).await;

    let second = info_for("renamed.qvw", &content);
    assert_ne!(first.uid, second.uid);

    let missing =
        sp.chunk_store.write_chunk(&second, 0, chunk(&content, 0)).await.unwrap();
    assert!(missing.is_empty());
    let upload = sp.chunk_store.upload_status(&second.uid).await.unwrap();
    assert_eq!(upload.status, UploadStatus::Complete);
    // Both resolve to the one stored artifact.
    assert_eq!(sp.artifact_store.read(&second.checksum).await.unwrap(), content);
}

#[tokio::test]
async fn re_sending_the_same_upload_short_circuits() {
    let sp = provider_with_workers();
    let content = vec![9u8; 1200];
    let info = upload_file(&sp, "same.qvw", &content).await;

    let missing = sp.chunk_store.write_chunk(&info, 0, chunk(&content, 0)).await.unwrap();
    assert!(missing.is_empty());
}

struct PublicationFixture {
    item: RootContentItem,
    emea: HierarchyFieldValue,
    amer: HierarchyFieldValue,
    phantom: HierarchyFieldValue,
    groups: Vec<SelectionGroup>,
}

/// One reducible item with a Region hierarchy and three audience groups,
/// plus a `Phantom` field no master record carries.
async fn seed_publication(sp: &Arc<ServiceProvider>) -> PublicationFixture {
    let item = RootContentItem {
        id: Uuid::new_v4(),
        name: "weekly sales".to_string(),
        kind: ContentKind::Reducible,
    };
    sp.root_item_repo.insert(&item).await.unwrap();

    let region = HierarchyField {
        id: Uuid::new_v4(),
        root_content_item_id: item.id,
        name: "Region".to_string(),
    };
    let phantom_field = HierarchyField {
        id: Uuid::new_v4(),
        root_content_item_id: item.id,
        name: "Phantom".to_string(),
    };
    sp.hierarchy_repo.insert_field(&region).await.unwrap();
    sp.hierarchy_repo.insert_field(&phantom_field).await.unwrap();

    let emea = HierarchyFieldValue {
        id: Uuid::new_v4(),
        field_id: region.id,
        value: "EMEA".to_string(),
    };
    let amer = HierarchyFieldValue {
        id: Uuid::new_v4(),
        field_id: region.id,
        value: "AMER".to_string(),
    };
    let phantom = HierarchyFieldValue {
        id: Uuid::new_v4(),
        field_id: phantom_field.id,
        value: "ghost".to_string(),
    };
    for value in [&emea, &amer, &phantom] {
        sp.hierarchy_repo.insert_value(value).await.unwrap();
    }

    let mut groups = vec![];
    for (n, value_ids) in [vec![emea.id], vec![amer.id], vec![emea.id, amer.id]]
        .into_iter()
        .enumerate()
    {
        let group = SelectionGroup {
            id: Uuid::new_v4(),
            root_content_item_id: item.id,
            group_name: format!("group-{n}"),
            content_instance_url: format!("/content/{n}"),
            selected_hierarchy_field_value_ids: value_ids,
        };
        sp.selection_group_repo.insert(&group).await.unwrap();
        groups.push(group);
    }
    PublicationFixture {
        item,
        emea,
        amer,
        phantom,
        groups,
    }
}

const MASTER_V1: &[u8] = br#"{"Region":"EMEA","Client":"acme","rows":[1]}
{"Region":"AMER","Client":"acme","rows":[2]}
{"Region":"EMEA","Client":"globex","rows":[3]}
"#;

const MASTER_V2: &[u8] = br#"{"Region":"EMEA","Client":"acme","rows":[1]}
{"Region":"AMER","Client":"acme","rows":[2]}
{"Region":"EMEA","Client":"globex","rows":[3]}
{"Region":"AMER","Client":"globex","rows":[4]}
"#;

#[tokio::test]
async fn one_failing_group_keeps_its_old_artifact_while_siblings_go_live() {
    let sp = provider_with_workers();
    let fixture = seed_publication(&sp).await;
    let user = Uuid::new_v4();

    // First publication succeeds for all three audiences.
    let master = upload_file(&sp, "sales-v1.jsonl", MASTER_V1).await;
    let request_id = sp
        .publication_service
        .publish(fixture.item.id, vec![master_related(&master)], user)
        .await
        .unwrap();
    let view = wait_request_terminal(&sp, request_id).await;
    assert_eq!(view.status, PublicationStatus::Confirmed);

    let g2_path = group_live_path(&sp, fixture.item.id, fixture.groups[1].id);
    let g2_before = tokio::fs::read(&g2_path).await.unwrap();

    // Audience #2 now selects a field the master records don't carry.
    let mut broken = fixture.groups[1].clone();
    broken.selected_hierarchy_field_value_ids = vec![fixture.phantom.id];
    sp.selection_group_repo.insert(&broken).await.unwrap();

    let master2 = upload_file(&sp, "sales-v2.jsonl", MASTER_V2).await;
    let request_id = sp
        .publication_service
        .publish(fixture.item.id, vec![master_related(&master2)], user)
        .await
        .unwrap();
    let view = wait_tasks_terminal(&sp, request_id).await;

    assert_eq!(view.status, PublicationStatus::Failed);
    assert!(view.message.unwrap().contains("Phantom"));
    let status_of = |group_id: Uuid| {
        view.selection_groups
            .iter()
            .find(|g| g.selection_group_id == group_id)
            .unwrap()
            .status
    };
    assert_eq!(status_of(fixture.groups[0].id), ReductionTaskStatus::Replaced);
    assert_eq!(status_of(fixture.groups[1].id), ReductionTaskStatus::Failed);
    assert_eq!(status_of(fixture.groups[2].id), ReductionTaskStatus::Replaced);

    // The failed audience still serves the previous publication.
    assert_eq!(tokio::fs::read(&g2_path).await.unwrap(), g2_before);

    // Its healthy siblings moved to the new master.
    let g0 = tokio::fs::read(group_live_path(&sp, fixture.item.id, fixture.groups[0].id))
        .await
        .unwrap();
    assert_eq!(
        String::from_utf8(g0).unwrap().lines().count(),
        2,
        "EMEA view of the v2 master has two records"
    );
    let g2_live = tokio::fs::read(group_live_path(&sp, fixture.item.id, fixture.groups[2].id))
        .await
        .unwrap();
    assert_eq!(g2_live, MASTER_V2, "unrestricted region view equals the new master");
}

#[tokio::test]
async fn reduced_views_filter_by_the_snapshot_criteria() {
    let sp = provider_with_workers();
    let fixture = seed_publication(&sp).await;

    let master = upload_file(&sp, "sales.jsonl", MASTER_V1).await;
    let request_id = sp
        .publication_service
        .publish(fixture.item.id, vec![master_related(&master)], Uuid::new_v4())
        .await
        .unwrap();
    let view = wait_request_terminal(&sp, request_id).await;
    assert_eq!(view.status, PublicationStatus::Confirmed);

    let emea_view =
        tokio::fs::read(group_live_path(&sp, fixture.item.id, fixture.groups[0].id))
            .await
            .unwrap();
    let text = String::from_utf8(emea_view).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(text.lines().all(|l| l.contains(&format!(
        "\"Region\":\"{}\"",
        fixture.emea.value
    ))));

    let amer_view =
        tokio::fs::read(group_live_path(&sp, fixture.item.id, fixture.groups[1].id))
            .await
            .unwrap();
    let text = String::from_utf8(amer_view).unwrap();
    assert_eq!(text.lines().count(), 1);
    assert!(text.contains(&format!("\"Region\":\"{}\"", fixture.amer.value)));
}

#[tokio::test]
async fn concurrent_publishes_of_one_item_yield_one_processing_request() {
    // No background workers: the first request stays in Processing.
    let sp = provider();
    let item = RootContentItem {
        id: Uuid::new_v4(),
        name: "handbook".to_string(),
        kind: ContentKind::Static,
    };
    sp.root_item_repo.insert(&item).await.unwrap();
    let content = vec![1u8; 100];
    let info = info_for("handbook.pdf", &content);
    sp.chunk_store.write_chunk(&info, 0, content.clone()).await.unwrap();
    sp.finalize_service.try_finalize(&info.uid).await.unwrap();

    let user = Uuid::new_v4();
    let first = sp
        .publication_service
        .publish(item.id, vec![master_related(&info)], user)
        .await
        .unwrap();

    let second = sp
        .publication_service
        .publish(item.id, vec![master_related(&info)], user)
        .await;
    assert!(matches!(
        second,
        Err(PublicationException::ConcurrencyConflict { processing_request_id, .. })
            if processing_request_id == first
    ));
}

#[tokio::test]
async fn static_item_goes_live_unreduced_and_retains_the_replaced_artifact() {
    let sp = provider_with_workers();
    let item = RootContentItem {
        id: Uuid::new_v4(),
        name: "handbook".to_string(),
        kind: ContentKind::Static,
    };
    sp.root_item_repo.insert(&item).await.unwrap();
    let user = Uuid::new_v4();

    let v1 = upload_file(&sp, "handbook-v1.pdf", b"handbook v1").await;
    let request_id = sp
        .publication_service
        .publish(item.id, vec![master_related(&v1)], user)
        .await
        .unwrap();
    assert_eq!(
        wait_request_terminal(&sp, request_id).await.status,
        PublicationStatus::Confirmed
    );

    let master_path = sp
        .config
        .storage
        .serving_dir
        .join(item.id.to_string())
        .join("master");
    assert_eq!(tokio::fs::read(&master_path).await.unwrap(), b"handbook v1");

    let v2 = upload_file(&sp, "handbook-v2.pdf", b"handbook v2!").await;
    let request_id = sp
        .publication_service
        .publish(item.id, vec![master_related(&v2)], user)
        .await
        .unwrap();
    assert_eq!(
        wait_request_terminal(&sp, request_id).await.status,
        PublicationStatus::Confirmed
    );

    assert_eq!(tokio::fs::read(&master_path).await.unwrap(), b"handbook v2!");
    assert_eq!(
        tokio::fs::read(master_path.with_file_name("master.prev")).await.unwrap(),
        b"handbook v1"
    );
}

#[tokio::test]
async fn cancel_reclaims_scratch_and_marks_the_upload_error() {
    let sp = provider();
    let content = vec![5u8; 1500];
    let info = info_for("cancelled.qvw", &content);
    sp.chunk_store.write_chunk(&info, 0, chunk(&content, 0)).await.unwrap();

    sp.chunk_store.cancel(&info.uid).await.unwrap();
    let upload = sp.chunk_store.upload_status(&info.uid).await.unwrap();
    assert_eq!(upload.status, UploadStatus::Error);
    assert_eq!(upload.error_message.as_deref(), Some("Cancelled by client."));
}
