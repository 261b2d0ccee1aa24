extern crate proc_macro;

use proc_macro::{Delimiter, TokenStream, TokenTree};

fn get_type_name(input: TokenStream) -> String {
    let mut iter = input.into_iter();
    loop {
        match iter.next() {
            Some(TokenTree::Ident(ident)) => {
                let name = ident.to_string();
                if name == "struct" || name == "enum" || name == "union" {
                    if let Some(name) = iter.next() {
                        return name.to_string();
                    }
                }
            },
            None => break,
            _ => (),
        }
    }
    panic!("no type name found");
}

// Finds `#[event_kind(Kind)]` among the outer attributes and returns `Kind`.
fn get_event_kind(input: TokenStream) -> String {
    let mut iter = input.into_iter().peekable();
    while let Some(token) = iter.next() {
        let is_attribute = match token {
            TokenTree::Punct(ref punct) => punct.as_char() == '#',
            _ => false,
        };

        if !is_attribute {
            continue;
        }

        if let Some(TokenTree::Group(group)) = iter.peek() {
            if group.delimiter() != Delimiter::Bracket {
                continue;
            }

            let mut inner = group.stream().into_iter();
            match inner.next() {
                Some(TokenTree::Ident(ref ident)) if ident.to_string() == "event_kind" => (),
                _ => continue,
            }

            if let Some(TokenTree::Group(arguments)) = inner.next() {
                let kind = arguments.stream().to_string();
                if !kind.is_empty() {
                    return kind;
                }
            }
            panic!("#[event_kind(..)] needs exactly one EventKind variant");
        }
    }
    panic!("#[derive(Event)] requires an #[event_kind(..)] attribute");
}

/// Implements `rocky::event::Event` for a struct carrying a `receiver: ReceiverSlot` field.
/// The event's kind is fixed by the `#[event_kind(..)]` attribute.
#[proc_macro_derive(Event, attributes(event_kind))]
pub fn derive_event(input: TokenStream) -> TokenStream {
    let type_name = get_type_name(input.clone());
    let kind = get_event_kind(input);

    format!("
#[allow(non_snake_case)]
mod {0}_Event_impls {{
    use std::sync::Arc;
    use crate::event::{{Event, EventKind, EventReceiver}};
    impl Event for super::{0} {{
        fn kind(&self) -> EventKind {{
            EventKind::{1}
        }}

        fn receiver(&self) -> Option<&Arc<dyn EventReceiver>> {{
            self.receiver.get()
        }}

        fn set_receiver(&mut self, receiver: Arc<dyn EventReceiver>) {{
            self.receiver.set(receiver);
        }}
    }}
}}", type_name, kind).parse().unwrap()
}
