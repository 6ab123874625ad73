//! OpenAPI document assembled from the annotated handlers and payload shapes.

use utoipa::OpenApi;

use crate::handlers::meta::HealthBody;
use crate::payload::{
    BookingCreate, BookingStatus, BookingUpdate, CategoryCreate, CategoryUpdate, CommentCreate,
    CommentUpdate, PathwayCreate, PathwayUpdate, PostCreate, PostUpdate, ProfileCreate,
    ProfileUpdate, ServiceCreate, ServiceUpdate, StepCreate, StepUpdate, UserCreate, UserUpdate,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Kiri API",
        description = "REST API over reflected marketplace, blog, and academy tables"
    ),
    paths(
        crate::handlers::meta::root,
        crate::handlers::meta::health,
        crate::handlers::meta::tables,
        crate::handlers::entity::list,
        crate::handlers::entity::read,
        crate::handlers::entity::create,
        crate::handlers::entity::create_booking,
        crate::handlers::entity::update,
        crate::handlers::entity::delete,
    ),
    components(
        schemas(
            HealthBody,
            BookingStatus,
            ServiceCreate,
            ServiceUpdate,
            BookingCreate,
            BookingUpdate,
            CategoryCreate,
            CategoryUpdate,
            UserCreate,
            UserUpdate,
            ProfileCreate,
            ProfileUpdate,
            PostCreate,
            PostUpdate,
            CommentCreate,
            CommentUpdate,
            PathwayCreate,
            PathwayUpdate,
            StepCreate,
            StepUpdate,
        )
    ),
    tags(
        (name = "meta"),
        (name = "entities")
    )
)]
pub struct ApiDoc;
