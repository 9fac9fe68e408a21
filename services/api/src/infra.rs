use metrics_exporter_prometheus::PrometheusHandle;
use school_portal::config::PortalConfig;
use school_portal::store::{InMemoryBlobStore, InMemoryRecordStore};
use school_portal::workflows::academics::AcademicsService;
use school_portal::workflows::admissions::AdmissionService;
use school_portal::workflows::courses::CourseService;
use school_portal::workflows::fees::FeeService;
use school_portal::workflows::students::StudentService;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Every workflow service, sharing one record store and one blob store.
#[derive(Clone)]
pub(crate) struct Portal {
    pub(crate) blobs: Arc<InMemoryBlobStore>,
    pub(crate) academics: Arc<AcademicsService<InMemoryRecordStore>>,
    pub(crate) admissions: Arc<AdmissionService<InMemoryRecordStore, InMemoryBlobStore>>,
    pub(crate) students: Arc<StudentService<InMemoryRecordStore>>,
    pub(crate) courses: Arc<CourseService<InMemoryRecordStore>>,
    pub(crate) fees: Arc<FeeService<InMemoryRecordStore, InMemoryBlobStore>>,
}

impl Portal {
    pub(crate) fn in_memory(config: &PortalConfig) -> Self {
        let store = Arc::new(InMemoryRecordStore::new());
        let blobs = Arc::new(InMemoryBlobStore::new(config.public_url.clone()));

        Self {
            academics: Arc::new(AcademicsService::new(store.clone())),
            admissions: Arc::new(AdmissionService::new(store.clone(), blobs.clone())),
            students: Arc::new(StudentService::new(store.clone())),
            courses: Arc::new(CourseService::new(store.clone(), config.max_unit_load)),
            fees: Arc::new(FeeService::new(store, blobs.clone())),
            blobs,
        }
    }
}
