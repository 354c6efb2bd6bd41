use proc_macro::TokenStream;
use proc_macro2::Literal;
use quote::{quote, ToTokens};
use syn::{
    braced, parenthesized,
    parse::{Parse, ParseStream},
    parse_macro_input,
    punctuated::Punctuated,
    spanned::Spanned,
    token::{Brace, Comma, Paren},
    Error, Expr, FieldValue, FnArg, ItemFn, Member, Pat, Result, Token, Type, TypePath,
};
use uuid::Uuid;

enum ParsedElementChild {
    Element(ParsedElement),
    Expr(Expr),
}

struct ParsedElement {
    ty: TypePath,
    key: Option<Expr>,
    props: Punctuated<FieldValue, Comma>,
    children: Vec<ParsedElementChild>,
    // Identifies the call site. It is generated once per expansion, so it's the same every time a
    // given `element!` invocation is evaluated.
    site_id: u128,
}

fn is_key(member: &Member) -> bool {
    matches!(member, Member::Named(ident) if ident == "key")
}

impl Parse for ParsedElement {
    /// Parses a single element of the form:
    ///
    /// MyComponent(key: "k", my_prop: "foo") {
    ///     // children
    /// }
    fn parse(input: ParseStream) -> Result<Self> {
        let ty: TypePath = input.parse()?;

        let mut key = None;
        let mut props = Punctuated::new();
        if input.peek(Paren) {
            let props_input;
            parenthesized!(props_input in input);
            let fields = Punctuated::<FieldValue, Comma>::parse_terminated(&props_input)?;
            for field in fields {
                if is_key(&field.member) {
                    if key.is_some() {
                        return Err(Error::new(field.span(), "duplicate `key` property"));
                    }
                    key = Some(field.expr);
                } else {
                    props.push(field);
                }
            }
        }

        let mut children = Vec::new();
        if input.peek(Brace) {
            let children_input;
            braced!(children_input in input);
            while !children_input.is_empty() {
                if children_input.peek(Token![#]) {
                    children_input.parse::<Token![#]>()?;
                    let child_input;
                    parenthesized!(child_input in children_input);
                    children.push(ParsedElementChild::Expr(child_input.parse()?));
                } else {
                    children.push(ParsedElementChild::Element(children_input.parse()?));
                }
            }
        }

        Ok(Self {
            ty,
            key,
            props,
            children,
            site_id: Uuid::new_v4().as_u128(),
        })
    }
}

impl ToTokens for ParsedElement {
    fn to_tokens(&self, tokens: &mut proc_macro2::TokenStream) {
        let ty = &self.ty;

        let key = match &self.key {
            Some(expr) => quote!(::tickcraft::ElementKey::from(#expr)),
            None => {
                let site_id = Literal::u128_suffixed(self.site_id);
                quote!(::tickcraft::ElementKey::site(#site_id))
            }
        };

        let props = self
            .props
            .iter()
            .map(|FieldValue { member, expr, .. }| quote!(#member: (#expr).into()))
            .collect::<Vec<_>>();

        let set_children = if !self.children.is_empty() {
            let children = self.children.iter().map(|child| match child {
                ParsedElementChild::Element(child) => quote!(#child),
                ParsedElementChild::Expr(expr) => quote!(#expr),
            });
            Some(quote! {
                #(::tickcraft::extend_with_elements(&mut _tickcraft_element.props.children, #children);)*
            })
        } else {
            None
        };

        tokens.extend(quote! {
            {
                type Props = <#ty as ::tickcraft::ElementType>::Props;
                #[allow(unused_mut)]
                let mut _tickcraft_element = ::tickcraft::Element::<#ty>{
                    key: #key,
                    props: Props{
                        #(#props,)*
                        ..::core::default::Default::default()
                    },
                };
                #set_children
                _tickcraft_element
            }
        });
    }
}

/// Creates an element.
///
/// Elements are written as a component type, optionally followed by props in parentheses and
/// children in braces. Children may be other elements, or any expression yielding elements when
/// wrapped in `#(...)`. The special `key` prop sets the element's key, which otherwise defaults to
/// a value unique to the macro invocation.
#[proc_macro]
pub fn element(input: TokenStream) -> TokenStream {
    let element = parse_macro_input!(input as ParsedElement);
    quote!(#element).into()
}

enum ComponentImplementationArg {
    Hooks,
    Props,
}

struct ParsedComponent {
    f: ItemFn,
    props_type: Option<Box<Type>>,
    args: Vec<ComponentImplementationArg>,
}

impl Parse for ParsedComponent {
    fn parse(input: ParseStream) -> Result<Self> {
        let f: ItemFn = input.parse()?;

        if !f.sig.generics.params.is_empty() {
            return Err(Error::new(
                f.sig.generics.span(),
                "components cannot be generic",
            ));
        }

        let mut props_type = None;
        let mut has_hooks = false;
        let mut args = Vec::new();

        for arg in &f.sig.inputs {
            let FnArg::Typed(arg) = arg else {
                return Err(Error::new(arg.span(), "invalid argument"));
            };
            let Pat::Ident(pat) = &*arg.pat else {
                return Err(Error::new(arg.pat.span(), "invalid argument"));
            };
            match pat.ident.to_string().trim_start_matches('_') {
                "props" => {
                    if props_type.is_some() {
                        return Err(Error::new(arg.span(), "duplicate `props` argument"));
                    }
                    match &*arg.ty {
                        Type::Reference(r) => {
                            props_type = Some(r.elem.clone());
                            args.push(ComponentImplementationArg::Props);
                        }
                        _ => return Err(Error::new(arg.ty.span(), "invalid `props` type")),
                    }
                }
                "hooks" => {
                    if has_hooks {
                        return Err(Error::new(arg.span(), "duplicate `hooks` argument"));
                    }
                    match &*arg.ty {
                        Type::Path(_) => {
                            has_hooks = true;
                            args.push(ComponentImplementationArg::Hooks);
                        }
                        _ => return Err(Error::new(arg.ty.span(), "invalid `hooks` type")),
                    }
                }
                _ => return Err(Error::new(arg.span(), "invalid argument")),
            }
        }

        Ok(Self {
            f,
            props_type,
            args,
        })
    }
}

impl ToTokens for ParsedComponent {
    fn to_tokens(&self, tokens: &mut proc_macro2::TokenStream) {
        let attrs = &self.f.attrs;
        let vis = &self.f.vis;
        let name = &self.f.sig.ident;
        let args = &self.f.sig.inputs;
        let block = &self.f.block;
        let output = &self.f.sig.output;

        let props_type_name = self
            .props_type
            .as_ref()
            .map(|ty| quote!(#ty))
            .unwrap_or_else(|| quote!(::tickcraft::NoProps));

        let impl_args = self
            .args
            .iter()
            .map(|arg| match arg {
                ComponentImplementationArg::Hooks => quote!(hooks),
                ComponentImplementationArg::Props => quote!(props),
            })
            .collect::<Vec<_>>();

        tokens.extend(quote! {
            #(#attrs)*
            #vis struct #name;

            impl #name {
                fn implementation(#args) #output #block
            }

            impl ::tickcraft::Component for #name {
                type Props = #props_type_name;

                fn new(_props: &Self::Props) -> Self {
                    Self
                }

                #[allow(unused_variables)]
                fn update(
                    &mut self,
                    props: &mut Self::Props,
                    hooks: ::tickcraft::Hooks,
                    updater: &mut ::tickcraft::ComponentUpdater,
                ) {
                    let mut e: ::tickcraft::AnyElement = Self::implementation(#(#impl_args),*).into();
                    updater.update_children([&mut e]);
                }
            }
        });
    }
}

/// Defines a component from a function.
///
/// The function may take a `props: &T` (or `&mut T`) argument, where `T` implements `Default`,
/// and a `hooks: Hooks` argument, in either order. It returns the element to render. Components
/// defined without props take [`NoProps`](../tickcraft/struct.NoProps.html).
#[proc_macro_attribute]
pub fn component(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let component = parse_macro_input!(item as ParsedComponent);
    quote!(#component).into()
}
