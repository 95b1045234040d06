//! Object store lifecycle: record, resolve, clear, merge, index.

use coqrst::domain::{make_target, ObjectStore, ObjectType, Subdomain};

fn store() -> ObjectStore {
    let mut store = ObjectStore::new();
    store.register("intros", "tactics", ObjectType::Tac);
    store.register("intros ‘ident’…‘ident’", "tactics", ObjectType::Tacn);
    store.register("Print ‘qualid’", "commands", ObjectType::Cmd);
    store.register("Print All", "commands", ObjectType::Cmdv);
    store.register("Not a proposition.", "errors", ObjectType::Exn);
    store
}

#[test]
fn resolve_by_subdomain() {
    let store = store();
    let entry = store.resolve(Subdomain::Cmd, "Print All").expect("recorded");
    assert_eq!(entry.docname, "commands");
    assert_eq!(entry.objtype, ObjectType::Cmdv);
    assert_eq!(entry.target, "coq:cmdv.print-all");

    assert!(store.resolve(Subdomain::Tac, "Print All").is_none());
    assert!(store.resolve(Subdomain::Tacn, "intros").is_none());
}

#[test]
fn same_name_in_different_subdomains_is_fine() {
    let mut store = ObjectStore::new();
    assert!(store.record("I", "a", ObjectType::Tac, "coq:tac.i").is_none());
    assert!(store.record("I", "b", ObjectType::Thm, "coq:thm.i").is_none());
    assert_eq!(store.len(), 2);
}

#[test]
fn duplicate_is_reported_and_later_wins() {
    let mut store = store();
    let (_, duplicate) = store.register("intros", "other", ObjectType::Tac);
    let duplicate = duplicate.expect("duplicate reported");
    assert_eq!(duplicate.previous_docname, "tactics");
    assert_eq!(duplicate.docname, "other");
    assert_eq!(
        duplicate.to_string(),
        "Duplicate Coq object: intros; other is in tactics"
    );
    assert_eq!(
        store.resolve(Subdomain::Tac, "intros").map(|e| e.docname.as_str()),
        Some("other")
    );
}

#[test]
fn clear_doc_removes_only_that_document() {
    let mut store = store();
    store.clear_doc("commands");
    assert!(store.resolve(Subdomain::Cmd, "Print All").is_none());
    assert!(store.resolve(Subdomain::Cmd, "Print ‘qualid’").is_none());
    assert!(store.resolve(Subdomain::Tac, "intros").is_some());
    assert_eq!(store.len(), 3);
}

#[test]
fn merge_takes_selected_documents() {
    let mut ours = ObjectStore::new();
    ours.record("auto", "tactics", ObjectType::Tac, "coq:tac.auto");

    let mut theirs = ObjectStore::new();
    theirs.record("auto", "automation", ObjectType::Tac, "coq:tac.auto");
    theirs.record("eauto", "automation", ObjectType::Tac, "coq:tac.eauto");
    theirs.record("Qed", "proofs", ObjectType::Cmd, "coq:cmd.qed");

    let duplicates = ours.merge(&["automation"], &theirs);

    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].name, "auto");
    assert_eq!(
        ours.resolve(Subdomain::Tac, "auto").map(|e| e.docname.as_str()),
        Some("automation")
    );
    assert!(ours.resolve(Subdomain::Tac, "eauto").is_some());
    assert!(ours.resolve(Subdomain::Cmd, "Qed").is_none());
}

#[test]
fn objects_lists_everything() {
    let store = store();
    let objects = store.objects();
    assert_eq!(objects.len(), 5);
    assert!(objects.iter().any(|o| o.name == "Not a proposition."
        && o.target == make_target(ObjectType::Exn, "not-a-proposition")));
}
