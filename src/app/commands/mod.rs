pub mod backup;
pub mod file;
pub mod link;
pub mod list;
pub mod monitor;
pub mod storage;

#[cfg(feature = "cli")]
use crate::config::cli::{Command, FileCommand, LinkCommand, StorageCommand};
#[cfg(feature = "cli")]
use crate::config::{provide_root, ArkPaths};
#[cfg(feature = "cli")]
use crate::utils::error::Result;

/// 依子命令分派到對應的處理函式
#[cfg(feature = "cli")]
pub async fn dispatch(paths: &ArkPaths, command: Command) -> Result<()> {
    match command {
        Command::List {
            root_dir,
            entry,
            entry_id,
            entry_path,
            modified,
            tags,
            scores,
            sort,
            filter,
        } => {
            let root = provide_root(root_dir.as_deref())?;
            let entry = list::resolve_entry_output(entry, entry_id, entry_path)?;
            let options = list::ListOptions {
                entry,
                modified,
                tags,
                scores,
                sort,
                filter,
            };
            print!("{}", list::run_list(&root, &options)?);
        }
        Command::Backup { roots_cfg } => {
            backup::run_backup_command(paths, roots_cfg.as_deref())?;
        }
        Command::Collisions { root_dir } => {
            let root = provide_root(root_dir.as_deref())?;
            println!("{}", monitor::run_collisions(&root)?);
        }
        Command::Monitor { root_dir, interval } => {
            let root = provide_root(root_dir.as_deref())?;
            let interval = interval.unwrap_or(1000);
            monitor::run_monitor(&root, interval).await?;
        }
        Command::Link(link_cmd) => match link_cmd {
            LinkCommand::Create {
                root_dir,
                url,
                title,
                desc,
            } => {
                let root = provide_root(root_dir.as_deref())?;
                link::run_link_create(&root, url.as_deref(), title.as_deref(), desc.as_deref())
                    .await?;
            }
            LinkCommand::Load {
                root_dir,
                file_path,
                id,
            } => {
                let root = provide_root(root_dir.as_deref())?;
                let data = link::run_link_load(&root, file_path.as_deref(), id.as_deref())?;
                println!("Link data:\n{:?}", data);
            }
        },
        Command::File(file_cmd) => match file_cmd {
            FileCommand::Append {
                root_dir,
                storage,
                id,
                content,
                format,
                kind,
            } => {
                file::run_file_append(&root_dir, &storage, &id, &content, format, kind)?;
            }
            FileCommand::Insert {
                root_dir,
                storage,
                id,
                content,
                format,
                kind,
            } => {
                file::run_file_insert(&root_dir, &storage, &id, &content, format, kind)?;
            }
            FileCommand::Read {
                root_dir,
                storage,
                id,
                kind,
            } => {
                println!("{}", file::run_file_read(&root_dir, &storage, &id, kind)?);
            }
        },
        Command::Storage(storage_cmd) => match storage_cmd {
            StorageCommand::List {
                root_dir,
                storage,
                kind,
                versions,
            } => {
                let output = storage::run_storage_list(
                    root_dir.as_deref(),
                    storage.as_deref(),
                    kind,
                    versions,
                )?;
                println!("{}", output);
            }
        },
    }

    Ok(())
}
