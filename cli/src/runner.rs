//! CLI runner. Both commands load and compile manifests the same way, then
//! either emit the result or compare it against an expectation.

use {
    crate::{
        manifest::Manifest,
        output::{OutputFormat, RenderedMessage},
    },
    keel::{
        nonce::resolve_durable_nonce,
        result::{CompiledMessage, Compare, Config},
        MessageCompiler,
    },
    trezoa_hash::Hash,
    trezoa_pubkey::Pubkey,
    std::{
        collections::HashMap,
        error::Error,
        fs,
        path::{Path, PathBuf},
    },
};

pub struct Runner {
    compiler: MessageCompiler,
    nonces: HashMap<Pubkey, Hash>,
    verbose: bool,
}

impl Runner {
    pub fn new(nonces: HashMap<Pubkey, Hash>, verbose: bool) -> Self {
        Self {
            compiler: MessageCompiler::default(),
            nonces,
            verbose,
        }
    }

    fn compile(&self, manifest: &Manifest) -> Result<CompiledMessage, Box<dyn Error>> {
        let transaction = manifest.to_transaction()?;

        // A nonce pinned in the manifest wins over the configured one.
        let transaction = match manifest.lifetime.pinned_nonce()? {
            Some((nonce_account, nonce)) => {
                let mut nonces = self.nonces.clone();
                nonces.insert(nonce_account, nonce);
                resolve_durable_nonce(&transaction, &nonces)?
            }
            None => resolve_durable_nonce(&transaction, &self.nonces)?,
        };

        Ok(self.compiler.compile(&transaction)?)
    }

    fn load_and_compile(
        &self,
        manifest_path: &str,
    ) -> Result<(Manifest, CompiledMessage), Box<dyn Error>> {
        let manifest = Manifest::try_load(manifest_path)?;
        let message = self.compile(&manifest)?;
        log::debug!(
            "Compiled {}: {} accounts, {} instructions",
            manifest_path,
            message.ordered_accounts.len(),
            message.instructions.len()
        );
        Ok((manifest, message))
    }

    fn verify(&self, manifest_path: &str, checks: &[Compare]) -> Result<bool, Box<dyn Error>> {
        if self.verbose {
            println!("----------------------------------------");
            println!("[VERIFY]: MANIFEST: {}", manifest_path);
        }

        let (manifest, message) = self.load_and_compile(manifest_path)?;

        let Some(expected) = &manifest.expected else {
            println!("FAIL: {} (no `expected` section)", manifest_path);
            return Ok(false);
        };
        let expected = CompiledMessage::try_from(expected)?;

        if self.verbose {
            println!("[VERIFY]: Result:");
            println!();
            println!("{:?}", &message);
            println!();
            println!("[VERIFY]: Comparing against expected message...");
            println!();
        }

        let pass = message.compare_with_config(
            &expected,
            checks,
            &Config {
                panic: false,
                verbose: self.verbose,
            },
        );

        if self.verbose {
            println!();
        }

        if pass {
            println!("PASS: {}", manifest_path);
        } else {
            println!("FAIL: {}", manifest_path);
        }

        if self.verbose {
            println!("----------------------------------------");
            println!();
        }

        Ok(pass)
    }

    /// Verify every manifest and return the number that failed. A manifest
    /// that cannot be loaded or compiled counts as a failure.
    pub fn verify_all(&self, manifests: &[String], checks: &[Compare]) -> usize {
        let mut failures = 0;

        for manifest_path in manifests {
            match self.verify(manifest_path, checks) {
                Ok(true) => {}
                Ok(false) => failures += 1,
                Err(err) => {
                    println!("FAIL: {} ({})", manifest_path, err);
                    failures += 1;
                }
            }
        }

        println!();
        println!("[DONE][VERIFY RESULT]: {} failures", failures);

        failures
    }

    pub fn compile_all(
        &self,
        manifests: &[String],
        format: OutputFormat,
        out_dir: Option<&Path>,
    ) -> Result<(), Box<dyn Error>> {
        if let Some(out_dir) = out_dir {
            fs::create_dir_all(out_dir)?;
        }

        for manifest_path in manifests {
            if self.verbose {
                println!("[COMPILE]: MANIFEST: {}", manifest_path);
            }

            let (_, message) = self.load_and_compile(manifest_path)?;
            let rendered = format.render(&RenderedMessage::from(&message))?;

            match out_dir {
                Some(out_dir) => {
                    let out_path = output_path(out_dir, manifest_path, format);
                    fs::write(&out_path, rendered)?;
                    if self.verbose {
                        println!("[COMPILE]: Wrote {}", out_path.display());
                    }
                }
                None => println!("{}", rendered),
            }
        }

        Ok(())
    }
}

fn output_path(out_dir: &Path, manifest_path: &str, format: OutputFormat) -> PathBuf {
    let name = Path::new(manifest_path)
        .file_stem()
        .map_or_else(|| manifest_path.into(), |stem| stem.to_string_lossy());
    out_dir.join(format!("{}.compiled.{}", name, format.extension()))
}
