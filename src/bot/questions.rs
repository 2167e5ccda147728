//! Question source
//!
//! An ordered, non-empty list of prompts that is reshuffled at the start of
//! every pass.

use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

/// Prompts asked when the config does not supply its own list
const BUILTIN_QUESTIONS: &[&str] = &[
    "Explain the complete mathematical foundation of blockchain consensus algorithms, including proof-of-work, proof-of-stake, and hybrid models.",
    "Develop a detailed framework for scaling blockchain networks without compromising security, including sharding and layer 2 solutions.",
    "Describe in extreme detail the cryptographic techniques used in the creation and verification of digital signatures in blockchain systems.",
    "Formulate a comprehensive analysis of the security implications of quantum computing on current blockchain protocols, and propose quantum-resistant solutions.",
    "Explain the complete process of creating a decentralized autonomous organization (DAO), including governance structures, decision-making models, and potential vulnerabilities.",
    "Develop a mathematical model for predicting the price fluctuations of cryptocurrencies using machine learning and blockchain data.",
    "Describe the complete process of implementing zk-SNARKs for private transactions in blockchain networks, including cryptographic primitives and computational complexities.",
    "Explain the full technical process of creating a decentralized finance (DeFi) protocol, including smart contract development, liquidity pooling, and risk management.",
    "Formulate a comprehensive strategy for ensuring the privacy and anonymity of users on public blockchain networks, including zero-knowledge proofs and advanced encryption methods.",
    "Develop a framework for the legal and regulatory implications of cryptocurrencies, including cross-border taxation issues and anti-money laundering protocols.",
    "Describe in meticulous detail the process of implementing atomic swaps between different blockchain networks and the cryptographic protocols involved.",
    "Develop a comprehensive analysis of the environmental impact of proof-of-work consensus mechanisms and propose sustainable alternatives.",
    "Formulate a detailed mathematical model of the incentive structures in blockchain mining pools, considering factors like rewards, network difficulty, and miner competition.",
    "Describe the full process of creating a non-fungible token (NFT) ecosystem, including smart contract development, minting, and secondary market dynamics.",
    "Explain the technical underpinnings of Ethereum's transition from proof-of-work to proof-of-stake, including network security considerations and scalability improvements.",
    "Develop a comprehensive framework for integrating cross-chain interoperability, focusing on decentralized bridges and communication protocols.",
    "Formulate a solution to the problem of transaction malleability in Bitcoin and other blockchain systems, including potential fixes and their trade-offs.",
    "Explain the economic implications of staking mechanisms in proof-of-stake blockchains, including validator incentives and network security.",
    "Describe the complete process of developing a Layer 2 scaling solution for Ethereum, such as Optimistic Rollups or zk-Rollups, including technical details and challenges.",
    "Develop a framework for decentralized identity management on the blockchain, including authentication methods, privacy considerations, and user control over data.",
    "Formulate a detailed solution for mitigating front-running attacks in decentralized exchanges (DEX), including algorithmic changes and smart contract enhancements.",
    "Describe the process of implementing and auditing smart contracts, focusing on security vulnerabilities such as reentrancy attacks, integer overflow, and access control flaws.",
    "Explain the role of oracles in blockchain-based smart contracts, including types of oracles, data sources, and potential attack vectors.",
    "Develop a mathematical framework for the tokenomics of a new cryptocurrency, including emission schedules, inflation control, and long-term sustainability.",
    "Describe the technical process of implementing decentralized storage solutions like IPFS or Filecoin, including security, redundancy, and scalability concerns.",
    "Formulate a detailed proposal for creating a decentralized prediction market, including smart contract architecture, liquidity pools, and incentive mechanisms.",
    "Explain the entire process of creating a privacy-focused blockchain, including the integration of privacy-enhancing technologies like ring signatures and stealth addresses.",
    "Develop a comprehensive analysis of the risks and benefits of stablecoins, including algorithmic vs. collateralized models and their role in the global financial system.",
    "Formulate a solution for minimizing network congestion and transaction fees on high-traffic blockchain networks, including layer 2 and off-chain solutions.",
    "Explain the implications of the Ethereum 2.0 upgrade on existing decentralized applications (dApps) and the future of Ethereum’s scalability.",
    "Develop a framework for integrating decentralized finance with traditional financial systems, including regulatory challenges and interoperability solutions.",
    "Formulate a complete mathematical model for predicting the security and decentralization of a blockchain network based on its architecture and governance model.",
    "Explain the cryptographic principles behind hash functions used in blockchain, including collision resistance, pre-image resistance, and second pre-image resistance.",
    "Develop a comprehensive strategy for preventing Sybil attacks in decentralized networks, including reputation systems and identity verification mechanisms.",
    "Describe in detail the process of creating a decentralized lending platform on the blockchain, including risk management and collateralization models.",
    "Explain the implications of blockchain forks on network security and governance, and develop strategies for resolving contentious hard forks.",
    "Formulate a complete theory of token velocity and its impact on the long-term valuation of cryptocurrencies, considering factors like staking, utility, and supply control.",
    "Develop a model for evaluating the potential security risks of decentralized applications (dApps), including smart contract auditing tools and best practices.",
    "Describe the challenges of implementing decentralized exchanges (DEX) for cross-chain trading, including liquidity management and price slippage.",
    "Explain the full process of implementing and securing a decentralized oracle network, including consensus mechanisms and fault tolerance.",
    "Develop a comprehensive proposal for scaling blockchain governance models to support billions of users, considering delegation, voting power, and network upgrades.",
    "Formulate a detailed plan for creating a privacy-preserving blockchain-based voting system, including cryptographic protocols and transparency considerations.",
    "Explain the complete mathematical and cryptographic process of creating a new cryptocurrency from scratch, including consensus mechanisms and tokenomics.",
    "Develop a framework for analyzing the security of smart contracts in DeFi protocols, focusing on common vulnerabilities and preventative measures.",
    "Describe in meticulous detail the process of creating a cross-chain decentralized application (dApp), including technical challenges and solutions for interoperability.",
    "Formulate a solution for reducing centralization risks in large-scale blockchain mining operations, including decentralized mining pools and fairness considerations.",
    "Explain the potential impacts of quantum computers on elliptic curve cryptography, and propose quantum-resistant cryptographic algorithms for blockchain systems.",
    "Develop a detailed analysis of the trade-offs between scalability, security, and decentralization in blockchain systems, known as the blockchain trilemma.",
    "Describe in detail the mathematical structure of a consensus algorithm in a proof-of-authority blockchain, including governance dynamics and validator roles.",
    "Explain the implications of network effects in cryptocurrency adoption, focusing on token liquidity, user growth, and ecosystem development.",];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuestionError {
    #[error("question list is empty")]
    Empty,

    #[error("question {0} is blank")]
    Blank(usize),
}

/// Non-empty collection of questions
#[derive(Debug, Clone)]
pub struct QuestionSource {
    questions: Vec<String>,
}

impl QuestionSource {
    /// Wrap a question list
    ///
    /// # Errors
    ///
    /// Fails when the list is empty or any entry is only whitespace.
    pub fn new(questions: Vec<String>) -> Result<Self, QuestionError> {
        if questions.is_empty() {
            return Err(QuestionError::Empty);
        }
        if let Some(idx) = questions.iter().position(|q| q.trim().is_empty()) {
            return Err(QuestionError::Blank(idx));
        }
        Ok(Self { questions })
    }

    /// The built-in blockchain question set
    pub fn builtin() -> Self {
        Self {
            questions: BUILTIN_QUESTIONS.iter().map(|q| q.to_string()).collect(),
        }
    }

    /// Configured questions, or the built-in set when none are configured
    pub fn from_config(questions: Option<Vec<String>>) -> Result<Self, QuestionError> {
        match questions {
            Some(questions) => Self::new(questions),
            None => Ok(Self::builtin()),
        }
    }

    /// Reorder the questions uniformly at random
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.questions.shuffle(rng);
    }

    pub fn as_slice(&self) -> &[String] {
        &self.questions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn numbered(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("question {}", i)).collect()
    }

    #[test]
    fn test_builtin_set_is_complete() {
        let source = QuestionSource::builtin();
        assert_eq!(source.as_slice().len(), 50);
        assert!(source.as_slice().iter().all(|q| !q.trim().is_empty()));
    }

    #[test]
    fn test_empty_list_rejected() {
        assert_eq!(QuestionSource::new(Vec::new()).unwrap_err(), QuestionError::Empty);
    }

    #[test]
    fn test_blank_entry_rejected() {
        let err = QuestionSource::new(vec!["ok".to_string(), "   ".to_string()]).unwrap_err();
        assert_eq!(err, QuestionError::Blank(1));
    }

    #[test]
    fn test_from_config_prefers_override() {
        let source = QuestionSource::from_config(Some(vec!["only one".to_string()])).unwrap();
        assert_eq!(source.as_slice(), ["only one".to_string()]);
        assert_eq!(QuestionSource::from_config(None).unwrap().as_slice().len(), 50);
    }

    #[test]
    fn test_shuffle_keeps_every_question_once() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in [1, 2, 5, 50] {
            let mut source = QuestionSource::new(numbered(n)).unwrap();
            source.shuffle_with(&mut rng);
            let mut seen = source.as_slice().to_vec();
            seen.sort();
            let mut expected = numbered(n);
            expected.sort();
            assert_eq!(seen, expected);
        }
    }

    #[test]
    fn test_consecutive_shuffles_differ() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut source = QuestionSource::builtin();
        source.shuffle_with(&mut rng);
        let first = source.as_slice().to_vec();
        source.shuffle_with(&mut rng);
        assert_ne!(first, source.as_slice());
    }
}
