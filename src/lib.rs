//! # Gallery Inventory Core
//!
//! The artwork inventory behind a gallery management front end: an ordered
//! registry of artwork records with create, update, delete and select
//! operations, a UI mode state machine for the browse/view/add/edit screens,
//! and optional LMDB persistence.
//!
//! ## Features
//!
//! - **Artwork registry**: ordered collection, stable unique ids, selection
//!   that follows deletions
//! - **Session state machine**: exactly one of browsing, viewing, adding or
//!   editing at a time, with form validation on submit
//! - **Pluggable storage**: volatile by default, LMDB when configured
//! - **FFI-ready**: JSON in, JSON out, for Flutter or web shells
//! - **Safe error handling**: No `unwrap()` calls in production code
//!
//! ## Quick Start
//!
//! ```rust
//! use gallery_inventory_core::artwork_model::ArtworkDraft;
//! use gallery_inventory_core::registry::ArtworkRegistry;
//!
//! let mut registry = ArtworkRegistry::with_samples();
//! let created = registry.create(ArtworkDraft {
//!     title: "Tidal Study".to_string(),
//!     artist: "Noor Haddad".to_string(),
//!     price: 640.0,
//!     ..ArtworkDraft::default()
//! })?;
//! assert_eq!(created.id, 5);
//! # Ok::<(), gallery_inventory_core::registry_error::RegistryError>(())
//! ```
//!
//! ## FFI Functions
//!
//! Every function returning a string returns an [`AppResponse`] envelope as
//! JSON, e.g. `{"Ok":"[...]"}` or `{"NotFound":"..."}`. Release those strings
//! with [`gallery_free_string`].
//!
//! - [`gallery_open`] / [`gallery_close`] - Session lifecycle
//! - [`gallery_list`], [`gallery_get`], [`gallery_selected`] - Reads
//! - [`gallery_create`], [`gallery_update`], [`gallery_delete`], [`gallery_clear`] - Writes
//! - [`gallery_select`], [`gallery_add_tag`], [`gallery_remove_tag`]
//! - [`gallery_mode`], [`gallery_view`], [`gallery_open_add`], [`gallery_open_edit`],
//!   [`gallery_set_form`], [`gallery_add_form_tag`], [`gallery_remove_form_tag`],
//!   [`gallery_cancel`], [`gallery_submit`] - Screen modes and forms

pub mod artwork_model;
pub mod artwork_store;
pub mod gallery_session;
pub mod registry;
pub mod registry_config;
pub mod registry_error;
mod app_response;

pub use crate::app_response::AppResponse;

use crate::artwork_model::ArtworkDraft;
use crate::gallery_session::GallerySession;
use crate::registry_config::RegistryConfig;

use log::{info, warn};
use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Opens a gallery session.
///
/// # Parameters
///
/// * `config_json` - Null-terminated [`RegistryConfig`] JSON, or null for the
///   defaults (volatile storage, no sample data)
///
/// # Returns
///
/// A pointer to the session, or null when the configuration cannot be parsed
/// or the store cannot be opened. Release it with [`gallery_close`].
///
/// # Examples
///
/// ```no_run
/// use std::ffi::CString;
/// use gallery_inventory_core::{gallery_close, gallery_open};
///
/// let config = CString::new(r#"{"seedSamples":true,"storage":{"kind":"lmdb","path":"gallery"}}"#).unwrap();
/// let session = gallery_open(config.as_ptr());
/// assert!(!session.is_null());
/// gallery_close(session);
/// ```
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn gallery_open(config_json: *const c_char) -> *mut GallerySession {
    let config = if config_json.is_null() {
        RegistryConfig::default()
    } else {
        let raw = match unsafe { CStr::from_ptr(config_json).to_str() } {
            Ok(s) => s,
            Err(e) => {
                warn!("Invalid UTF-8 in config: {e}");
                return std::ptr::null_mut();
            }
        };
        match RegistryConfig::from_json(raw) {
            Ok(config) => config,
            Err(e) => {
                warn!("Invalid registry config: {e}");
                return std::ptr::null_mut();
            }
        }
    };

    match GallerySession::open(&config) {
        Ok(session) => {
            info!("Gallery session opened");
            Box::into_raw(Box::new(session))
        }
        Err(e) => {
            warn!("Failed to open gallery session: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Frees a session returned by [`gallery_open`]. The pointer must not be used
/// afterwards.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn gallery_close(session: *mut GallerySession) -> *const c_char {
    if session.is_null() {
        let error = AppResponse::BadRequest("Null session pointer passed to gallery_close".to_string());
        return response_to_c_string(&error);
    }

    drop(unsafe { Box::from_raw(session) });
    info!("Gallery session closed");
    response_to_c_string(&AppResponse::success("Gallery session closed"))
}

/// Releases a string returned by any other `gallery_*` function.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn gallery_free_string(ptr: *const c_char) {
    if ptr.is_null() {
        return;
    }
    drop(unsafe { CString::from_raw(ptr as *mut c_char) });
}

/// Returns every artwork, in order, as a JSON array.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn gallery_list(session: *mut GallerySession) -> *const c_char {
    with_session(session, "gallery_list", |session| AppResponse::json(session.registry().list()))
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn gallery_get(session: *mut GallerySession, id: u64) -> *const c_char {
    with_session(session, "gallery_get", |session| match session.registry().get(id) {
        Some(record) => AppResponse::json(record),
        None => AppResponse::NotFound(format!("No artwork found with id: {id}")),
    })
}

/// Creates an artwork from a draft.
///
/// # Parameters
///
/// * `session` - Session pointer from [`gallery_open`]
/// * `draft_json` - Artwork fields without an id; missing fields take their
///   blank-form defaults
///
/// # Returns
///
/// `Ok` with the created record (id assigned, placeholder image applied when
/// the image was blank).
///
/// # JSON Format
///
/// ```json
/// {
///   "title": "Sunset Horizon",
///   "artist": "Elena Cortez",
///   "dimensions": { "width": 36, "height": 24, "depth": 1.5 },
///   "price": 1200,
///   "status": "available",
///   "dateCreated": "2023-05-15",
///   "tags": ["landscape"]
/// }
/// ```
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn gallery_create(session: *mut GallerySession, draft_json: *const c_char) -> *const c_char {
    let draft: ArtworkDraft = match parse_json(draft_json, "draft") {
        Ok(draft) => draft,
        Err(error_ptr) => return error_ptr,
    };

    with_session(session, "gallery_create", |session| match session.create(draft) {
        Ok(record) => AppResponse::json(record),
        Err(e) => AppResponse::from(e),
    })
}

/// Replaces every field of artwork `id` with the supplied ones.
///
/// Returns `NotFound` when there is no such artwork; nothing changes then.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn gallery_update(session: *mut GallerySession, id: u64, fields_json: *const c_char) -> *const c_char {
    let fields: ArtworkDraft = match parse_json(fields_json, "fields") {
        Ok(fields) => fields,
        Err(error_ptr) => return error_ptr,
    };

    with_session(session, "gallery_update", |session| match session.update(id, fields) {
        Ok(true) => match session.registry().get(id) {
            Some(record) => AppResponse::json(record),
            None => AppResponse::NotFound(format!("No artwork found with id: {id}")),
        },
        Ok(false) => AppResponse::NotFound("Artwork not found for update".to_string()),
        Err(e) => AppResponse::from(e),
    })
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn gallery_delete(session: *mut GallerySession, id: u64) -> *const c_char {
    with_session(session, "gallery_delete", |session| match session.delete(id) {
        Ok(true) => AppResponse::success("Artwork deleted successfully"),
        Ok(false) => AppResponse::NotFound(format!("No artwork found with id: {id}")),
        Err(e) => AppResponse::from(e),
    })
}

/// Removes every artwork. The `Ok` payload is the number removed.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn gallery_clear(session: *mut GallerySession) -> *const c_char {
    with_session(session, "gallery_clear", |session| match session.clear() {
        Ok(removed) => AppResponse::json(&removed),
        Err(e) => AppResponse::from(e),
    })
}

/// Focuses artwork `id`; `0` clears the focus. The `Ok` payload is the
/// focused record, or `null`.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn gallery_select(session: *mut GallerySession, id: u64) -> *const c_char {
    let target = if id == 0 { None } else { Some(id) };
    with_session(session, "gallery_select", |session| AppResponse::json(&session.select(target)))
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn gallery_selected(session: *mut GallerySession) -> *const c_char {
    with_session(session, "gallery_selected", |session| AppResponse::json(&session.registry().selected()))
}

/// Adds a tag to a stored artwork. The `Ok` payload is `true` when the tag
/// was new and non-blank.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn gallery_add_tag(session: *mut GallerySession, id: u64, tag: *const c_char) -> *const c_char {
    let tag = match c_ptr_to_string(tag, "tag") {
        Ok(tag) => tag,
        Err(error_ptr) => return error_ptr,
    };

    with_session(session, "gallery_add_tag", |session| match session.add_tag(id, &tag) {
        Ok(changed) => AppResponse::json(&changed),
        Err(e) => AppResponse::from(e),
    })
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn gallery_remove_tag(session: *mut GallerySession, id: u64, tag: *const c_char) -> *const c_char {
    let tag = match c_ptr_to_string(tag, "tag") {
        Ok(tag) => tag,
        Err(error_ptr) => return error_ptr,
    };

    with_session(session, "gallery_remove_tag", |session| match session.remove_tag(id, &tag) {
        Ok(changed) => AppResponse::json(&changed),
        Err(e) => AppResponse::from(e),
    })
}

/// Current screen mode, e.g. `{"mode":"viewing","id":3}`.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn gallery_mode(session: *mut GallerySession) -> *const c_char {
    with_session(session, "gallery_mode", |session| AppResponse::json(session.mode()))
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn gallery_view(session: *mut GallerySession, id: u64) -> *const c_char {
    with_session(session, "gallery_view", |session| match session.view(id) {
        Ok(record) => AppResponse::json(record),
        Err(e) => AppResponse::from(e),
    })
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn gallery_open_add(session: *mut GallerySession) -> *const c_char {
    with_session(session, "gallery_open_add", |session| {
        session.open_add();
        AppResponse::json(session.mode())
    })
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn gallery_open_edit(session: *mut GallerySession, id: u64) -> *const c_char {
    with_session(session, "gallery_open_edit", |session| match session.open_edit(id) {
        Ok(()) => AppResponse::json(session.mode()),
        Err(e) => AppResponse::from(e),
    })
}

/// Replaces the contents of the open add or edit form.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn gallery_set_form(session: *mut GallerySession, fields_json: *const c_char) -> *const c_char {
    let fields: ArtworkDraft = match parse_json(fields_json, "form") {
        Ok(fields) => fields,
        Err(error_ptr) => return error_ptr,
    };

    with_session(session, "gallery_set_form", |session| match session.set_form(fields) {
        Ok(()) => AppResponse::json(session.mode()),
        Err(e) => AppResponse::from(e),
    })
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn gallery_add_form_tag(session: *mut GallerySession, tag: *const c_char) -> *const c_char {
    let tag = match c_ptr_to_string(tag, "tag") {
        Ok(tag) => tag,
        Err(error_ptr) => return error_ptr,
    };

    with_session(session, "gallery_add_form_tag", |session| match session.add_form_tag(&tag) {
        Ok(changed) => AppResponse::json(&changed),
        Err(e) => AppResponse::from(e),
    })
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn gallery_remove_form_tag(session: *mut GallerySession, tag: *const c_char) -> *const c_char {
    let tag = match c_ptr_to_string(tag, "tag") {
        Ok(tag) => tag,
        Err(error_ptr) => return error_ptr,
    };

    with_session(session, "gallery_remove_form_tag", |session| match session.remove_form_tag(&tag) {
        Ok(changed) => AppResponse::json(&changed),
        Err(e) => AppResponse::from(e),
    })
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn gallery_cancel(session: *mut GallerySession) -> *const c_char {
    with_session(session, "gallery_cancel", |session| {
        session.cancel();
        AppResponse::json(session.mode())
    })
}

/// Validates and commits the open form.
///
/// # Returns
///
/// `Ok` with the id of the created or updated artwork, `ValidationError` when
/// a required field is missing (the form stays open), or `BadRequest` when no
/// form is open.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn gallery_submit(session: *mut GallerySession) -> *const c_char {
    with_session(session, "gallery_submit", |session| match session.submit() {
        Ok(id) => AppResponse::json(&id),
        Err(e) => AppResponse::from(e),
    })
}

fn with_session<F>(session: *mut GallerySession, fn_name: &str, op: F) -> *const c_char
where
    F: FnOnce(&mut GallerySession) -> AppResponse,
{
    let session = match unsafe { session.as_mut() } {
        Some(s) => s,
        None => {
            let error = AppResponse::BadRequest(format!("Null session pointer passed to {fn_name}"));
            return response_to_c_string(&error);
        }
    };

    let response = op(session);
    if !matches!(response, AppResponse::Ok(_)) {
        warn!("{fn_name}: {response}");
    }
    response_to_c_string(&response)
}

fn parse_json<T: serde::de::DeserializeOwned>(ptr: *const c_char, field_name: &str) -> Result<T, *const c_char> {
    let json_str = c_ptr_to_string(ptr, field_name)?;
    serde_json::from_str(&json_str).map_err(|e| {
        let error = AppResponse::SerializationError(format!("Invalid {field_name} JSON: {e}"));
        response_to_c_string(&error)
    })
}

fn response_to_c_string(response: &AppResponse) -> *const c_char {
    let json = match serde_json::to_string(response) {
        Ok(j) => j,
        Err(e) => {
            warn!("Error serializing response: {e}");
            return std::ptr::null();
        }
    };

    match CString::new(json) {
        Ok(c_str) => c_str.into_raw(),
        Err(e) => {
            warn!("Error creating CString: {e}");
            std::ptr::null()
        }
    }
}

fn c_ptr_to_string(ptr: *const c_char, field_name: &str) -> Result<String, *const c_char> {
    if ptr.is_null() {
        let error = AppResponse::BadRequest(format!("Null {field_name} pointer"));
        return Err(response_to_c_string(&error));
    }

    match unsafe { CStr::from_ptr(ptr).to_str() } {
        Ok(s) => Ok(s.to_string()),
        Err(e) => {
            let error = AppResponse::BadRequest(format!("Invalid UTF-8 in {field_name}: {e}"));
            Err(response_to_c_string(&error))
        }
    }
}
