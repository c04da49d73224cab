//! Project, collection and metadata schema management
//!
//! All three groups authenticate with a signed timestamp in the
//! `IMX-Signature`/`IMX-Timestamp` headers.

use super::{print_record, wallet_from};
use crate::cli::{CollectionsCommand, MetadataCommand, ProjectsCommand};
use crate::client::ImxClient;
use crate::signing::ImxAuth;
use crate::types::{
    AddMetadataSchemaRequest, CreateCollectionRequest, CreateProjectRequest, MetadataField,
    MetadataSchemaUpdate,
};
use anyhow::{bail, Context, Result};
use tracing::info;

/// Run an `imx projects` action
pub async fn run_projects(client: &ImxClient, command: ProjectsCommand) -> Result<()> {
    match command {
        ProjectsCommand::Create {
            signer,
            project_name,
            company_name,
            contact_email,
        } => {
            let wallet = wallet_from(&signer)?;
            let auth = ImxAuth::sign_now(&wallet)?;
            let request = CreateProjectRequest {
                name: project_name,
                company_name,
                contact_email,
            };
            info!(name = %request.name, "creating project");

            let project = client
                .create_project(&auth, &request)
                .await
                .context("failed to create project")?;
            print_record("Created project", &project)
        }
    }
}

/// Run an `imx collections` action
pub async fn run_collections(client: &ImxClient, command: CollectionsCommand) -> Result<()> {
    match command {
        CollectionsCommand::Create {
            signer,
            contract_address,
            name,
            owner_public_key,
            project_id,
            metadata_api_url,
        } => {
            let wallet = wallet_from(&signer)?;
            let auth = ImxAuth::sign_now(&wallet)?;
            let request = CreateCollectionRequest {
                contract_address,
                name,
                owner_public_key,
                project_id,
                metadata_api_url,
            };
            info!(
                contract = %request.contract_address,
                project_id = request.project_id,
                "creating collection"
            );

            let collection = client
                .create_collection(&auth, &request)
                .await
                .context("failed to create collection")?;
            print_record("Created collection", &collection)
        }
    }
}

/// Run an `imx metadata` action
pub async fn run_metadata(client: &ImxClient, command: MetadataCommand) -> Result<()> {
    match command {
        MetadataCommand::Post {
            signer,
            collection_address,
            name,
            field_type,
            filterable,
        } => {
            let wallet = wallet_from(&signer)?;
            let auth = ImxAuth::sign_now(&wallet)?;
            let request = AddMetadataSchemaRequest {
                metadata: vec![MetadataField {
                    name,
                    field_type,
                    filterable,
                }],
            };

            let collection = client
                .add_metadata_schema(&auth, &collection_address, &request)
                .await
                .with_context(|| format!("failed to add metadata schema to {collection_address}"))?;
            print_record("Added metadata schema to collection", &collection)
        }
        MetadataCommand::Update {
            signer,
            collection_address,
            name,
            new_name,
            field_type,
            filterable,
        } => {
            let update = MetadataSchemaUpdate {
                name: new_name,
                field_type,
                filterable,
            };
            if update.is_empty() {
                bail!("nothing to update: pass --new-name, --type or --filterable");
            }

            let wallet = wallet_from(&signer)?;
            let auth = ImxAuth::sign_now(&wallet)?;

            let result = client
                .update_metadata_schema_by_name(&auth, &collection_address, &name, &update)
                .await
                .with_context(|| format!("failed to update metadata property {name}"))?;
            print_record("Updated metadata schema", &result)
        }
    }
}
