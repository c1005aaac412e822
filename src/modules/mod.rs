pub mod user {
    pub mod schema;
    pub mod model;
    pub mod repository;
    pub mod repository_pg;
    pub mod handle;
    pub mod service;
    pub mod route;
}

pub mod company {
    pub mod schema;
    pub mod model;
    pub mod repository;
    pub mod repository_pg;
    pub mod handle;
    pub mod service;
    pub mod route;
}

pub mod upload {
    pub mod schema;
    pub mod model;
    pub mod repository;
    pub mod repository_pg;
    pub mod storage;
    pub mod handle;
    pub mod service;
    pub mod route;
}

pub mod bid {
    pub mod schema;
    pub mod model;
    pub mod repository;
    pub mod repository_pg;
}

pub mod bidding {
    pub mod model;
    pub mod service;
    pub mod sweeper;
    pub mod handle;
    pub mod route;
}

pub mod notification {
    pub mod model;
    pub mod repository;
    pub mod repository_pg;
    pub mod dispatcher;
    pub mod service;
    pub mod handle;
    pub mod route;
}
